use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{OpaqueMessage, ToolCallRequest};

/// The role of a conversation entry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system instructions.
    System,
    /// The end user.
    User,
    /// The model.
    Assistant,
    /// A tool call result.
    Tool,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// One unit in the conversation log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Entry {
    /// The system instructions.
    System {
        /// The instructions text.
        content: String,
    },
    /// A user input text.
    User {
        /// The input text.
        content: String,
    },
    /// A decision made by the model.
    Assistant(AssistantEntry),
    /// A tool call result.
    Tool(ToolEntry),
}

/// The assistant entry, which is built from a [`Decision`](crate::Decision).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantEntry {
    /// The text content, absent if the model only requested tools.
    pub content: Option<String>,
    /// Tool calls requested in this entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// The provider specific form of this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<OpaqueMessage>,
}

/// The result of calling a tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolEntry {
    /// The identifier of the tool call request this entry answers.
    pub tool_call_id: String,
    /// The name of the called tool.
    pub name: String,
    /// The result of the tool call.
    pub content: String,
}

impl Entry {
    /// Creates a system entry.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Entry::System {
            content: content.into(),
        }
    }

    /// Creates a user entry.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Entry::User {
            content: content.into(),
        }
    }

    /// Returns the role of this entry.
    #[inline]
    pub fn role(&self) -> Role {
        match self {
            Entry::System { .. } => Role::System,
            Entry::User { .. } => Role::User,
            Entry::Assistant(_) => Role::Assistant,
            Entry::Tool(_) => Role::Tool,
        }
    }

    /// Returns the text content of this entry, if any.
    #[inline]
    pub fn content(&self) -> Option<&str> {
        match self {
            Entry::System { content } | Entry::User { content } => {
                Some(content)
            }
            Entry::Assistant(entry) => entry.content.as_deref(),
            Entry::Tool(entry) => Some(&entry.content),
        }
    }

    /// Returns the tool calls requested in this entry.
    ///
    /// Only assistant entries can request tools, the slice is empty for
    /// any other role.
    #[inline]
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Entry::Assistant(entry) => &entry.tool_calls,
            _ => &[],
        }
    }
}
