//! In-memory host and ratio lookup used to drive the adjuster without Kodi or the network.

#![allow(dead_code)]

use autofit::clients::bluray::LookupError;
use autofit::models::aspect::AspectRatio;
use autofit::services::{Host, RatioLookup};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Replies to RPC methods from per-method queues. The last queued reply repeats.
#[derive(Default)]
pub struct FakeHost {
    responses: Mutex<HashMap<String, VecDeque<Option<Value>>>>,
    calls: Mutex<Vec<(String, Value)>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host playing a 1920x1080 file of the movie "Heat" (1995).
    pub fn playing_movie() -> Self {
        Self::new()
            .respond("Player.GetActivePlayers", json!([{"playerid": 1, "type": "video"}]))
            .respond_stream(1920, 1080)
            .respond(
                "Player.GetItem",
                json!({"item": {
                    "label": "Heat",
                    "type": "movie",
                    "showtitle": "",
                    "premiered": "1995-12-15",
                    "customproperties": {}
                }}),
            )
            .respond("Player.SetViewMode", json!("OK"))
    }

    pub fn respond(self, method: &str, value: Value) -> Self {
        self.queue(method, Some(value))
    }

    /// Makes the next call to `method` fail.
    pub fn fail(self, method: &str) -> Self {
        self.queue(method, None)
    }

    pub fn respond_stream(self, width: u32, height: u32) -> Self {
        self.respond(
            "Player.GetProperties",
            json!({"videostreams": [{"width": width, "height": height, "codec": "h264"}]}),
        )
    }

    /// Drops every queued reply for `method`.
    pub fn reset(self, method: &str) -> Self {
        self.responses.lock().unwrap().remove(method);
        self
    }

    fn queue(self, method: &str, value: Option<Value>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(value);
        self
    }

    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Host for FakeHost {
    async fn call(&self, method: &str, params: Value) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(method)?;
        if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().cloned().flatten()
        }
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Ratio(f64),
    NotFound,
    ParseFailed,
}

pub struct FakeLookup {
    reply: Scripted,
    queries: Mutex<Vec<(String, String)>>,
}

impl FakeLookup {
    pub fn new(reply: Scripted) -> Self {
        Self {
            reply,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn ratio(value: f64) -> Self {
        Self::new(Scripted::Ratio(value))
    }

    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RatioLookup for FakeLookup {
    async fn lookup(&self, title: &str, year: &str) -> Result<AspectRatio, LookupError> {
        self.queries
            .lock()
            .unwrap()
            .push((title.to_string(), year.to_string()));

        match self.reply {
            Scripted::Ratio(value) => {
                AspectRatio::new(value).ok_or_else(|| LookupError::ParseFailed(value.to_string()))
            }
            Scripted::NotFound => Err(LookupError::NotFound("movie link in search results")),
            Scripted::ParseFailed => Err(LookupError::ParseFailed("aspect ratio".to_string())),
        }
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}
