//! Lifecycle hooks that zoom letterboxed 16:9 files to fill a wide screen.
//!
//! One playback start produces at most one `Player.SetViewMode` call. Nothing
//! is reverted on stop: the host scopes a view mode to the playback session.

use std::fmt;
use tracing::{error, info, warn};

use crate::clients::bluray::LookupError;
use crate::config::{AutofitConfig, MetadataSource, StartEvent};
use crate::constants::labels;
use crate::models::aspect::{AspectRatio, ViewMode, decide};
use crate::services::host::{Host, RatioLookup};
use crate::services::identify::{MediaIdentity, identify, identify_with_labels};
use crate::services::retry::{RetryPolicy, poll_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    NoVideoPlayer,
    NoStreamDetails,
    NoItemDetails,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoVideoPlayer => "no active video player",
            Self::NoStreamDetails => "video stream details unavailable",
            Self::NoItemDetails => "item details unavailable",
        };
        write!(f, "{s}")
    }
}

/// What a playback-start hook ended up doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentOutcome {
    /// The view mode was sent. `acknowledged` is false when the host's reply was lost or an error.
    Applied { view: ViewMode, acknowledged: bool },
    /// Container or content ratio did not call for a change.
    NotNeeded {
        video: AspectRatio,
        content: AspectRatio,
    },
    /// No content ratio could be resolved and fallback is disabled.
    NoContentRatio,
    Disabled,
    Aborted(AbortReason),
}

impl AdjustmentOutcome {
    #[must_use]
    pub const fn view_mode(&self) -> Option<ViewMode> {
        match self {
            Self::Applied { view, .. } => Some(*view),
            _ => None,
        }
    }
}

pub struct Adjuster<H, L> {
    host: H,
    lookup: L,
}

impl<H: Host, L: RatioLookup> Adjuster<H, L> {
    #[must_use]
    pub const fn new(host: H, lookup: L) -> Self {
        Self { host, lookup }
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Readiness polling is only needed when the hook fires on nominal start.
    fn readiness_policy(settings: &AutofitConfig) -> RetryPolicy {
        match settings.start_event {
            StartEvent::Play => {
                RetryPolicy::new(settings.readiness_attempts, settings.readiness_delay())
            }
            StartEvent::AvStart => RetryPolicy::ONCE,
        }
    }

    pub async fn on_playback_started(&self, settings: &AutofitConfig) -> AdjustmentOutcome {
        let outcome = self.adjust(settings).await;
        match outcome {
            AdjustmentOutcome::Applied { view, acknowledged } => {
                if acknowledged {
                    info!(
                        "Custom view mode applied: zoom {:.3}, pixel ratio {:.4}",
                        view.zoom, view.pixel_ratio
                    );
                } else {
                    warn!("View mode was sent but the host did not confirm it");
                }
            }
            AdjustmentOutcome::NotNeeded { video, content } => {
                info!("No adjustment needed. Container AR: {video}, Content AR: {content}");
            }
            AdjustmentOutcome::NoContentRatio => {
                info!("No content aspect ratio available, no adjustments made");
            }
            AdjustmentOutcome::Disabled => info!("Autofit is disabled in settings. Skipping."),
            AdjustmentOutcome::Aborted(reason) => {
                error!("Aborting adjustment: {reason}");
            }
        }
        outcome
    }

    pub fn on_playback_stopped(&self, ended: bool) {
        if ended {
            info!("Playback ended.");
        } else {
            info!("Playback stopped.");
        }
    }

    async fn adjust(&self, settings: &AutofitConfig) -> AdjustmentOutcome {
        if !settings.enable_autofit {
            return AdjustmentOutcome::Disabled;
        }

        let readiness = Self::readiness_policy(settings);

        let Some(player_id) = poll_until(
            readiness,
            "active video player",
            move || self.host.active_video_player(),
            move |d| self.host.sleep(d),
        )
        .await
        else {
            return AdjustmentOutcome::Aborted(AbortReason::NoVideoPlayer);
        };

        info!("Playback started. Analyzing video stream.");
        let screen_ar = settings.screen_ar();

        let Some((width, height)) = poll_until(
            readiness,
            "video stream details",
            move || async move {
                let props = self.host.video_properties(player_id).await?;
                props.described_stream().map(|s| (s.width, s.height))
            },
            move |d| self.host.sleep(d),
        )
        .await
        else {
            return AdjustmentOutcome::Aborted(AbortReason::NoStreamDetails);
        };

        let Some(video) = AspectRatio::from_dimensions(width, height) else {
            warn!("Video stream reports {width}x{height}");
            return AdjustmentOutcome::Aborted(AbortReason::NoStreamDetails);
        };
        info!("Video resolution: {width}x{height}, Container AR: {video}");

        let Some(item) = self.host.current_item(player_id).await else {
            return AdjustmentOutcome::Aborted(AbortReason::NoItemDetails);
        };

        let identity = match settings.metadata_source {
            MetadataSource::Rpc => identify(&item),
            MetadataSource::InfoLabels => {
                let info = self
                    .host
                    .info_labels(&[labels::SHOW_TITLE, labels::TITLE, labels::YEAR])
                    .await;
                identify_with_labels(&item, &info)
            }
        };

        let Some(content) = self.content_ratio(&identity, settings).await else {
            return AdjustmentOutcome::NoContentRatio;
        };

        // `screen_ar` is validated as > 1 when parsed.
        let screen = AspectRatio::new(screen_ar).unwrap_or(AspectRatio::WIDESCREEN);

        let Some(view) = decide(video, content, screen) else {
            return AdjustmentOutcome::NotNeeded { video, content };
        };

        info!(
            "16:9 container with wider content detected. Effective AR {} (min of content {content} and screen {screen})",
            content.min(screen)
        );

        let acknowledged = self.host.set_view_mode(view).await;
        AdjustmentOutcome::Applied { view, acknowledged }
    }

    async fn content_ratio(
        &self,
        identity: &MediaIdentity,
        settings: &AutofitConfig,
    ) -> Option<AspectRatio> {
        let scraped = match identity.search_terms() {
            Some((title, year)) => self.lookup.lookup(title, year).await,
            None => Err(LookupError::MissingQuery),
        };

        let err = match scraped {
            Ok(ratio) => {
                info!("Using scraped AR: {ratio}");
                return Some(ratio);
            }
            Err(err) => err,
        };

        match &err {
            LookupError::MissingQuery => {
                info!("Title or year is missing, cannot perform web search.");
            }
            LookupError::Network(e) => error!("Network error while scraping: {e}"),
            LookupError::NotFound(_) | LookupError::ParseFailed(_) => {
                warn!("Aspect ratio lookup failed: {err}");
            }
        }

        let fallback = settings.fallback.fallback_for(identity.kind);
        if let Some(ratio) = fallback {
            let kind = identity
                .kind
                .map_or_else(|| "unknown".to_string(), |k| k.to_string());
            info!("Fallback for media type '{kind}': assuming AR is {ratio}");
        }
        fallback
    }
}
