//! Tool call supports.

mod error;
mod object;
mod registry;

use std::sync::LazyLock;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

pub use error::{Error, ErrorKind};
pub(crate) use object::{AnyTool, ToolObject};
pub use registry::Registry;

/// The result of a tool call.
pub type ToolResult = Result<String, Error>;

/// A tool that can be called by the model.
///
/// Every tool takes exactly one string input and produces one string
/// output. Errors returned from [`Tool::run`] never abort a turn, they are
/// rendered into text and handed back to the model as the tool output.
///
/// Implementations of this trait should be stateless. If the tool needs
/// some context (e.g. a working directory), make it an immutable state of
/// the tool, which can be set during initialization, and copy it when
/// executing.
pub trait Tool: Send + Sync + 'static {
    /// Returns the name of the tool.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Runs the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    fn run(
        &self,
        input: String,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}

/// The argument payload every tool call must carry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ToolArguments {
    /// The single input of the tool.
    #[schemars(description = "The input to be passed to the tool.")]
    pub tool_input: String,
}

static INPUT_SCHEMA: LazyLock<Value> =
    LazyLock::new(|| schema_for!(ToolArguments).to_value());

/// Returns the JSON schema of [`ToolArguments`], which is shared by all
/// the tools.
#[inline]
pub fn input_schema() -> &'static Value {
    &INPUT_SCHEMA
}
