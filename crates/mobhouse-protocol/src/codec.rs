//! Codec trait and implementations for handing notifications across a
//! UI bridge.
//!
//! The gate itself works with typed values. A host that renders the site
//! in another process (a webview, a terminal UI, a test harness) needs
//! bytes, and the [`Codec`] trait is the seam where that conversion
//! happens. [`JsonCodec`] is the only implementation for now.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` so a codec can live inside a long-running
/// task next to the gate's event stream.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Browsers and devtools read JSON natively, which is what the site's
/// front end expects. Behind the `json` feature flag (on by default).
///
/// ## Example
///
/// ```rust
/// use mobhouse_protocol::{Codec, ContentId, GateEvent, JsonCodec};
///
/// let codec = JsonCodec;
/// let event = GateEvent::PreviewExpired {
///     content_id: ContentId::from("mix-1"),
/// };
///
/// let bytes = codec.encode(&event).unwrap();
/// let decoded: GateEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(event, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{GateEvent, PrivilegedAction};

    #[test]
    fn test_json_codec_encodes_internally_tagged_event() {
        let codec = JsonCodec;
        let event = GateEvent::AuthPromptRequested {
            action: PrivilegedAction::PurchaseTicket,
            content_id: None,
        };

        let bytes = codec.encode(&event).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["type"], "AuthPromptRequested");
        assert_eq!(json["action"], "PurchaseTicket");
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_decode_error() {
        let codec = JsonCodec;

        let result: Result<GateEvent, _> = codec.decode(b"{not json");

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_unknown_tag_returns_decode_error() {
        let codec = JsonCodec;

        let result: Result<GateEvent, _> =
            codec.decode(br#"{"type":"TicketPrinted"}"#);

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
