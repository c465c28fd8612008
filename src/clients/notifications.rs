use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Player lifecycle transitions pushed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback nominally started; stream details may not be known yet.
    Started,
    /// First frame rendered; stream details are populated.
    AvStarted,
    Stopped,
    Ended,
    /// The host is shutting down.
    Quit,
}

#[derive(Debug, Deserialize)]
struct Notification {
    #[serde(default)]
    method: Option<String>,

    #[serde(default)]
    params: Value,
}

impl PlayerEvent {
    #[must_use]
    pub fn from_notification(method: &str, params: &Value) -> Option<Self> {
        match method {
            "Player.OnPlay" => Some(Self::Started),
            "Player.OnAVStart" => Some(Self::AvStarted),
            "Player.OnStop" => {
                let ended = params
                    .pointer("/data/end")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Some(if ended { Self::Ended } else { Self::Stopped })
            }
            "System.OnQuit" => Some(Self::Quit),
            _ => None,
        }
    }
}

fn to_event(value: Value) -> Option<PlayerEvent> {
    let notification: Notification = serde_json::from_value(value).ok()?;
    let method = notification.method?;
    let event = PlayerEvent::from_notification(&method, &notification.params);
    if event.is_none() {
        debug!("Ignoring notification {method}");
    }
    event
}

/// Pending bytes allowed for a single unfinished object before it is dropped.
pub const MAX_PENDING: usize = 1024 * 1024;

/// Splits the event socket's byte stream into notifications.
///
/// The host writes JSON objects back to back with no delimiter, and a read can
/// end in the middle of one, so incomplete trailing bytes are kept for the next push.
#[derive(Debug, Default)]
pub struct NotificationDecoder {
    buf: Vec<u8>,
}

impl NotificationDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<PlayerEvent> {
        self.buf.extend_from_slice(bytes);

        let mut events = Vec::new();
        let mut consumed = 0;

        loop {
            let mut stream =
                serde_json::Deserializer::from_slice(&self.buf[consumed..]).into_iter::<Value>();

            match stream.next() {
                Some(Ok(value)) => {
                    consumed += stream.byte_offset();
                    events.extend(to_event(value));
                }
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(e)) => {
                    warn!("Discarding undecodable notification data: {e}");
                    // Resync on the next object start.
                    consumed = self.buf[consumed + 1..]
                        .iter()
                        .position(|&b| b == b'{')
                        .map_or(self.buf.len(), |offset| consumed + 1 + offset);
                }
                None => {
                    consumed = self.buf.len();
                    break;
                }
            }
        }

        self.buf.drain(..consumed);

        if self.buf.len() > MAX_PENDING {
            warn!(
                "Dropping {} bytes of an unterminated notification",
                self.buf.len()
            );
            self.buf.clear();
        }

        events
    }

    /// Bytes held back waiting for the rest of an object.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
