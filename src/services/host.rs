//! Seams between the adjuster and the outside world.
//!
//! The adjuster only needs to invoke host RPC methods, query info labels,
//! pause between readiness polls and look up a content ratio. Keeping those
//! behind traits lets tests drive it with in-memory fakes and a clock that
//! never actually sleeps.

use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

use crate::clients::bluray::LookupError;
use crate::constants::rpc;
use crate::models::aspect::{AspectRatio, ViewMode};
use crate::models::player::{ActivePlayer, PlayerItem, PlayerItemResponse, PlayerProperties};

/// The media-center host.
#[async_trait::async_trait]
pub trait Host: Send + Sync {
    /// Invokes an RPC method and returns its `result`.
    ///
    /// `None` means the outcome could not be determined; it never means `false`.
    async fn call(&self, method: &str, params: Value) -> Option<Value>;

    async fn sleep(&self, duration: Duration);

    /// Looks up info labels by key. Keys the host does not know are omitted.
    async fn info_labels(&self, keys: &[&str]) -> HashMap<String, String> {
        let Some(Value::Object(map)) = self
            .call(rpc::GET_INFO_LABELS, json!({ "labels": keys }))
            .await
        else {
            return HashMap::new();
        };

        map.into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect()
    }

    /// Id of the active video player, if any.
    async fn active_video_player(&self) -> Option<i64> {
        let result = self.call(rpc::GET_ACTIVE_PLAYERS, json!({})).await?;
        let players: Vec<ActivePlayer> = decode(rpc::GET_ACTIVE_PLAYERS, result)?;
        players.into_iter().find(ActivePlayer::is_video).map(|p| p.id)
    }

    async fn video_properties(&self, player_id: i64) -> Option<PlayerProperties> {
        let result = self
            .call(
                rpc::GET_PROPERTIES,
                json!({ "playerid": player_id, "properties": ["videostreams"] }),
            )
            .await?;
        decode(rpc::GET_PROPERTIES, result)
    }

    async fn current_item(&self, player_id: i64) -> Option<PlayerItem> {
        let result = self
            .call(
                rpc::GET_ITEM,
                json!({ "playerid": player_id, "properties": rpc::ITEM_PROPERTIES }),
            )
            .await?;
        decode::<PlayerItemResponse>(rpc::GET_ITEM, result).map(|r| r.item)
    }

    /// Applies a view mode to the active player. Returns whether the host acknowledged it.
    async fn set_view_mode(&self, view: ViewMode) -> bool {
        self.call(rpc::SET_VIEW_MODE, json!({ "viewmode": view }))
            .await
            .is_some()
    }
}

fn decode<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> Option<T> {
    serde_json::from_value(value)
        .map_err(|e| warn!("Unexpected {method} result shape: {e}"))
        .ok()
}

/// Source of the true content aspect ratio for a title.
#[async_trait::async_trait]
pub trait RatioLookup: Send + Sync {
    async fn lookup(&self, title: &str, year: &str) -> Result<AspectRatio, LookupError>;
}
