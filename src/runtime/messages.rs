// Inbound control message protocol

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recognized control messages from the host page.
///
/// The wire shape is `{"type": "<KIND>"}`. Anything else — unknown kinds,
/// missing or non-string `type`, non-object payloads — is ignored silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// `{"type": "SKIP_WAITING"}`: promote a waiting version immediately.
    SkipWaiting,
    /// `{"type": "GET_VERSION"}`: reply with the app-shell store identity.
    GetVersion,
}

impl ControlMessage {
    pub fn parse(payload: &Value) -> Option<Self> {
        match payload.get("type")?.as_str()? {
            "SKIP_WAITING" => Some(ControlMessage::SkipWaiting),
            "GET_VERSION" => Some(ControlMessage::GetVersion),
            _ => None,
        }
    }
}

/// Reply to `GET_VERSION`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionReply {
    pub version: String,
}
