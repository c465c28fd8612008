use std::collections::HashMap;
use tracing::info;

use crate::constants::labels;
use crate::models::player::{MediaKind, PlayerItem, non_empty};

/// What the web lookup needs to know about the playing item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaIdentity {
    pub kind: Option<MediaKind>,
    pub title: Option<String>,
    pub year: Option<String>,
}

impl MediaIdentity {
    /// Title and year, or `None` when either is missing.
    #[must_use]
    pub fn search_terms(&self) -> Option<(&str, &str)> {
        Some((self.title.as_deref()?, self.year.as_deref()?))
    }
}

/// Content kind: the scraper-provided `tmdb_type` wins over the built-in item type.
#[must_use]
pub fn media_kind(item: &PlayerItem) -> Option<MediaKind> {
    if let Some(custom) = item.custom("tmdb_type") {
        let kind = MediaKind::parse(&custom);
        info!("Media type determined from tmdb_type: '{kind}'");
        return Some(kind);
    }

    let kind = item.kind.as_deref().and_then(non_empty).map(|k| MediaKind::parse(&k));
    match kind {
        Some(kind) => info!("tmdb_type not found. Using item type: '{kind}'"),
        None => info!("Item carries no media type"),
    }
    kind
}

fn release_year(item: &PlayerItem) -> Option<String> {
    item.custom("premiered.year").or_else(|| {
        item.premiered
            .as_deref()
            .map(str::trim)
            .and_then(|date| date.get(..4))
            .and_then(non_empty)
    })
}

/// Identifies the item from the fields returned by `Player.GetItem`.
#[must_use]
pub fn identify(item: &PlayerItem) -> MediaIdentity {
    let kind = media_kind(item);

    let title = if kind.is_some_and(MediaKind::is_episodic) {
        let title = item.showtitle.as_deref().and_then(non_empty);
        info!("Media is a TV show/episode. Using show title for search: {title:?}");
        title
    } else {
        let title = item.label.as_deref().and_then(non_empty);
        info!("Media is a movie. Using item label for search: {title:?}");
        title
    };

    MediaIdentity {
        kind,
        title,
        year: release_year(item),
    }
}

/// Identifies the item with title and year taken from player info labels.
#[must_use]
pub fn identify_with_labels(item: &PlayerItem, info: &HashMap<String, String>) -> MediaIdentity {
    let kind = media_kind(item);
    let label = |key: &str| info.get(key).and_then(|v| non_empty(v));

    let title = if kind.is_some_and(MediaKind::is_episodic) {
        label(labels::SHOW_TITLE)
    } else {
        label(labels::TITLE)
    };
    info!("Using info label title for search: {title:?}");

    MediaIdentity {
        kind,
        title,
        year: label(labels::YEAR),
    }
}
