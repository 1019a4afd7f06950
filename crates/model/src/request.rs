use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Entry;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The conversation history, oldest first.
    pub entries: Vec<Entry>,
    /// Tools that are available to the model.
    pub tools: Vec<ToolDescriptor>,
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}
