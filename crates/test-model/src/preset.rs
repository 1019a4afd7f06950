use cogni_model::{Decision, OpaqueMessage, ToolCallRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The preset response for one completion request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// The text content of the decision.
    pub content: Option<String>,
    /// Tool calls requested by the decision.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a text-only `PresetResponse`.
    #[inline]
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Creates a `PresetResponse` that requests the specified tools.
    #[inline]
    pub fn with_tool_calls(
        tool_calls: impl Into<Vec<ToolCallRequest>>,
    ) -> Self {
        Self {
            tool_calls: tool_calls.into(),
            ..Default::default()
        }
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Builds the decision, with an OpenAI-like assistant message as its
    /// raw form.
    pub(crate) fn to_decision(&self) -> Decision {
        let tool_calls: Vec<Value> = self
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments,
                    },
                })
            })
            .collect();
        let mut raw = json!({
            "role": "assistant",
            "content": self.content,
        });
        if !tool_calls.is_empty() {
            raw["tool_calls"] = Value::Array(tool_calls);
        }

        Decision {
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
            raw: Some(OpaqueMessage::new(raw)),
        }
    }
}

/// Creates a tool call request whose payload is the single-input shape.
#[inline]
pub fn single_input_call<S1, S2, S3>(
    id: S1,
    name: S2,
    input: S3,
) -> ToolCallRequest
where
    S1: Into<String>,
    S2: Into<String>,
    S3: AsRef<str>,
{
    ToolCallRequest {
        id: id.into(),
        name: name.into(),
        arguments: json!({ "tool_input": input.as_ref() }).to_string(),
    }
}
