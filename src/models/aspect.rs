use serde::Serialize;
use std::fmt;

use crate::config::FallbackPolicy;
use crate::constants::ratio;
use crate::models::player::MediaKind;

/// A width/height ratio. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub const WIDESCREEN: Self = Self(ratio::WIDESCREEN);

    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Ratio of a frame. `None` when either side is zero.
    #[must_use]
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Self::new(f64::from(width) / f64::from(height))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether this container sits in the nominal 16:9 band.
    ///
    /// Many files are a pixel or two off exact 16:9, so the check is a band.
    #[must_use]
    pub fn is_nominal_widescreen(self) -> bool {
        let (low, high) = ratio::CONTAINER_BAND;
        low < self.0 && self.0 < high
    }

    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 { other } else { self }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// The zoom and pixel ratio sent to the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewMode {
    pub zoom: f64,

    #[serde(rename = "pixelratio")]
    pub pixel_ratio: f64,
}

/// Decides whether a letterboxed 16:9 file should be zoomed for the screen.
///
/// Returns `None` unless the container is nominal 16:9 and the content is
/// measurably wider than its container. The zoom targets the narrower of the
/// content and the screen so the picture is never cropped at the sides and
/// never over-zoomed vertically.
#[must_use]
pub fn decide(video: AspectRatio, content: AspectRatio, screen: AspectRatio) -> Option<ViewMode> {
    if !video.is_nominal_widescreen() || content.value() <= video.value() + ratio::WIDER_MARGIN {
        return None;
    }

    let effective = content.min(screen);

    Some(ViewMode {
        zoom: effective.value() / video.value(),
        pixel_ratio: ratio::WIDESCREEN / screen.value(),
    })
}

impl FallbackPolicy {
    /// Ratio to assume when the lookup produced nothing.
    #[must_use]
    pub fn fallback_for(self, kind: Option<MediaKind>) -> Option<AspectRatio> {
        match self {
            Self::None => None,
            Self::CategoryDefaults => match kind {
                Some(MediaKind::Movie) => AspectRatio::new(ratio::MOVIE_FALLBACK),
                _ => Some(AspectRatio::WIDESCREEN),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ar(value: f64) -> AspectRatio {
        AspectRatio::new(value).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_ratios() {
        assert!(AspectRatio::new(0.0).is_none());
        assert!(AspectRatio::new(-1.5).is_none());
        assert!(AspectRatio::new(f64::NAN).is_none());
        assert!(AspectRatio::from_dimensions(1920, 0).is_none());
    }

    #[test]
    fn test_scope_ratio_content_on_widescreen_container() {
        let video = AspectRatio::from_dimensions(1920, 1080).unwrap();
        let view = decide(video, ar(2.39), ar(2.40)).unwrap();

        assert!((view.zoom - 1.344).abs() < 0.001);
        assert!((view.pixel_ratio - 0.7407).abs() < 0.0001);
    }

    #[test]
    fn test_content_wider_than_screen_is_capped() {
        let video = AspectRatio::from_dimensions(1920, 1080).unwrap();
        let view = decide(video, ar(2.50), ar(2.40)).unwrap();

        assert!((view.zoom - 1.35).abs() < 0.001);
    }

    #[test]
    fn test_container_outside_band_is_left_alone() {
        let video = AspectRatio::from_dimensions(1920, 800).unwrap();
        assert!(decide(video, ar(2.39), ar(2.40)).is_none());
        assert!(decide(video, ar(3.0), ar(2.40)).is_none());

        let four_three = AspectRatio::from_dimensions(1440, 1080).unwrap();
        assert!(decide(four_three, ar(2.39), ar(2.40)).is_none());
    }

    #[test]
    fn test_band_excludes_its_ends() {
        let lower = AspectRatio::from_dimensions(177, 100).unwrap();
        let upper = AspectRatio::from_dimensions(179, 100).unwrap();
        assert!(decide(lower, ar(2.39), ar(2.40)).is_none());
        assert!(decide(upper, ar(2.39), ar(2.40)).is_none());

        let inside = AspectRatio::from_dimensions(178, 100).unwrap();
        assert!(decide(inside, ar(2.39), ar(2.40)).is_some());
    }

    #[test]
    fn test_content_not_wider_than_container() {
        let video = AspectRatio::from_dimensions(1920, 1080).unwrap();
        assert!(decide(video, AspectRatio::WIDESCREEN, ar(2.40)).is_none());
        assert!(decide(video, ar(video.value() + 0.01), ar(2.40)).is_none());
        assert!(decide(video, ar(1.85), ar(2.40)).is_some());
    }

    #[test]
    fn test_decision_is_pure() {
        let video = AspectRatio::from_dimensions(1920, 1080).unwrap();
        let first = decide(video, ar(2.20), ar(2.35));
        let second = decide(video, ar(2.20), ar(2.35));
        assert_eq!(first, second);
    }

    #[test]
    fn test_fallback_policy() {
        let defaults = FallbackPolicy::CategoryDefaults;
        assert_eq!(defaults.fallback_for(Some(MediaKind::Movie)), Some(ar(2.39)));
        assert_eq!(
            defaults.fallback_for(Some(MediaKind::Episode)),
            Some(AspectRatio::WIDESCREEN)
        );
        assert_eq!(defaults.fallback_for(None), Some(AspectRatio::WIDESCREEN));
        assert_eq!(FallbackPolicy::None.fallback_for(Some(MediaKind::Movie)), None);
    }

    #[test]
    fn test_view_mode_wire_shape() {
        let json = serde_json::to_value(ViewMode {
            zoom: 1.5,
            pixel_ratio: 0.75,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"zoom": 1.5, "pixelratio": 0.75}));
    }
}
