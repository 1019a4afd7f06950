use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque message from the model that doesn't need to be interpreted
/// by the agent.
///
/// Types this crate defines may lose context for the model. For example,
/// some providers rely on the complete assistant message (with provider
/// specific fields) to continue a conversation after a tool call. The
/// provider stores that structure here, the agent round-trips it into the
/// history verbatim, and the provider reads it back when building its
/// next request payload.
///
/// The value is shared and never mutated once created, so cloning is cheap
/// and a stored message cannot be changed through a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueMessage(Arc<Value>);

impl OpaqueMessage {
    /// Creates a new `OpaqueMessage` from a JSON value.
    #[inline]
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// Serializes a provider specific message into an `OpaqueMessage`.
    #[inline]
    pub fn from_raw<T: Serialize>(raw: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(raw).map(Self::new)
    }

    /// Converts the `OpaqueMessage` back into a provider specific type.
    ///
    /// Returns `None` if the message was produced by another provider and
    /// doesn't fit the requested shape.
    #[inline]
    pub fn to_raw<T: DeserializeOwned>(&self) -> Option<T> {
        T::deserialize(self.0.as_ref()).ok()
    }

    /// Returns the underlying JSON value.
    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct RawMessage {
        text: String,
    }

    #[test]
    fn test_convert_between() {
        let raw = RawMessage {
            text: "Hello".to_string(),
        };
        let opaque = OpaqueMessage::from_raw(&raw).unwrap();
        assert_eq!(opaque.as_value(), &json!({ "text": "Hello" }));

        let raw_back = opaque.to_raw::<RawMessage>().unwrap();
        assert_eq!(raw_back, raw);
        assert!(opaque.to_raw::<Vec<String>>().is_none());
    }

    #[test]
    fn test_clone_shares_value() {
        let opaque = OpaqueMessage::new(json!({ "role": "assistant" }));
        let cloned = opaque.clone();
        assert_eq!(opaque, cloned);
        assert!(std::ptr::eq(opaque.as_value(), cloned.as_value()));
        assert_ne!(opaque, OpaqueMessage::new(json!({ "role": "user" })));
    }

    #[test]
    fn test_serialize_transparent() {
        let opaque = OpaqueMessage::new(json!({ "content": "Hi" }));
        let serialized = serde_json::to_string(&opaque).unwrap();
        assert_eq!(serialized, r#"{"content":"Hi"}"#);
    }
}
