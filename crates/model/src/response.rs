use serde::{Deserialize, Serialize};

use crate::{AssistantEntry, Entry, OpaqueMessage};

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The raw argument payload, usually a JSON object encoded as text.
    ///
    /// It's kept exactly as the model produced it, and is only parsed when
    /// the tool is invoked.
    pub arguments: String,
}

/// The normalized output of one completion request.
///
/// A decision is either a final text reply, or a set of tool call requests
/// the model wants to be executed before it answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// The text content, absent when the model only requests tools.
    pub content: Option<String>,
    /// Tool calls requested by the model, in the order they were requested.
    pub tool_calls: Vec<ToolCallRequest>,
    /// The provider specific form of this decision, stored into the history
    /// verbatim.
    pub raw: Option<OpaqueMessage>,
}

impl Decision {
    /// Creates a text-only decision.
    #[inline]
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            raw: None,
        }
    }

    /// Creates a decision that requests tools.
    #[inline]
    pub fn tool_calls(tool_calls: impl Into<Vec<ToolCallRequest>>) -> Self {
        Self {
            content: None,
            tool_calls: tool_calls.into(),
            raw: None,
        }
    }

    /// Attaches the provider specific form of this decision.
    #[inline]
    pub fn with_raw(mut self, raw: OpaqueMessage) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Returns `true` if the model requested any tool.
    #[inline]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Converts this decision into the assistant entry of the history.
    #[inline]
    pub fn into_entry(self) -> Entry {
        Entry::Assistant(AssistantEntry {
            content: self.content,
            tool_calls: self.tool_calls,
            raw: self.raw,
        })
    }
}
