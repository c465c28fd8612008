use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::clients::notifications::{NotificationDecoder, PlayerEvent};
use crate::config::{AutofitConfig, Config, StartEvent};
use crate::services::adjuster::Adjuster;
use crate::services::host::{Host, RatioLookup};

/// Where the per-event settings come from.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    Fixed(AutofitConfig),
    /// Re-read on every event, keeping the last good copy if the file goes bad.
    File {
        path: Option<PathBuf>,
        last_good: AutofitConfig,
    },
}

impl SettingsSource {
    #[must_use]
    pub const fn file(path: Option<PathBuf>, initial: AutofitConfig) -> Self {
        Self::File {
            path,
            last_good: initial,
        }
    }

    pub fn current(&mut self) -> AutofitConfig {
        match self {
            Self::Fixed(settings) => settings.clone(),
            Self::File { path, last_good } => {
                match Config::load_from(path.as_deref()) {
                    Ok(config) => *last_good = config.autofit,
                    Err(e) => warn!("Could not reload settings, keeping previous ones: {e:#}"),
                }
                last_good.clone()
            }
        }
    }
}

/// Keeps the adjuster attached to the host's notification socket.
pub struct Listener<H, L> {
    adjuster: Adjuster<H, L>,
    settings: SettingsSource,
}

impl<H: Host, L: RatioLookup> Listener<H, L> {
    #[must_use]
    pub const fn new(adjuster: Adjuster<H, L>, settings: SettingsSource) -> Self {
        Self { adjuster, settings }
    }

    #[must_use]
    pub const fn adjuster(&self) -> &Adjuster<H, L> {
        &self.adjuster
    }

    /// Connects to `addr` and dispatches events until the host quits.
    ///
    /// Lost or refused connections are retried after `reconnect_delay`.
    pub async fn run(&mut self, addr: &str, reconnect_delay: Duration) {
        loop {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    info!("Connected to event socket at {addr}");
                    if self.process(stream).await.is_break() {
                        info!("Host is shutting down");
                        return;
                    }
                    warn!("Event socket at {addr} closed");
                }
                Err(e) => warn!("Could not connect to event socket at {addr}: {e}"),
            }

            tokio::time::sleep(reconnect_delay).await;
        }
    }

    /// Reads notifications from `reader` until it closes or the host quits.
    pub async fn process<R: AsyncRead + Unpin>(&mut self, mut reader: R) -> ControlFlow<()> {
        let mut decoder = NotificationDecoder::new();
        let mut buf = vec![0u8; 8 * 1024];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => return ControlFlow::Continue(()),
                Ok(n) => n,
                Err(e) => {
                    warn!("Event socket read failed: {e}");
                    return ControlFlow::Continue(());
                }
            };

            for event in decoder.push(&buf[..n]) {
                self.handle(event).await?;
            }
        }
    }

    pub async fn handle(&mut self, event: PlayerEvent) -> ControlFlow<()> {
        debug!("Player event: {event:?}");

        match event {
            PlayerEvent::Started | PlayerEvent::AvStarted => {
                let settings = self.settings.current();
                let wanted = match settings.start_event {
                    StartEvent::Play => PlayerEvent::Started,
                    StartEvent::AvStart => PlayerEvent::AvStarted,
                };
                if event == wanted {
                    self.adjuster.on_playback_started(&settings).await;
                }
            }
            PlayerEvent::Stopped => self.adjuster.on_playback_stopped(false),
            PlayerEvent::Ended => self.adjuster.on_playback_stopped(true),
            PlayerEvent::Quit => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }
}
