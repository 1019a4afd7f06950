use std::collections::HashMap;
use std::future::ready;
use std::pin::Pin;
use std::sync::Arc;

use cogni_model::ToolDescriptor;
use tracing::Instrument;

use crate::tool::{AnyTool, Error, Tool, ToolObject, input_schema};

/// A set of tools keyed by name, which handles tool call requests from the
/// model.
///
/// Tool names are unique. Registering a tool with a name that is already
/// taken replaces the earlier tool silently, keeping its position.
#[derive(Clone, Default)]
pub struct Registry {
    tools: Vec<Arc<dyn ToolObject>>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    pub fn register<T: Tool>(&mut self, tool: T) {
        let tool: Arc<dyn ToolObject> = Arc::new(AnyTool(tool));
        let name = tool.name().to_owned();
        match self.index.get(&name) {
            Some(&slot) => {
                debug!("replacing tool: {name}");
                self.tools[slot] = tool;
            }
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the descriptors of all tools, in registration order.
    pub fn describe(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: input_schema().clone(),
            })
            .collect()
    }

    /// Invokes the tool `name` with the raw argument payload.
    ///
    /// The returned future always resolves to the text that should be
    /// handed back to the model. Unknown tools, malformed arguments, tool
    /// errors and panics are all rendered into a descriptive error text.
    pub fn invoke(
        &self,
        name: &str,
        arguments: &str,
    ) -> Pin<Box<dyn Future<Output = String> + Send>> {
        let Some(tool) = self.index.get(name).map(|&slot| &self.tools[slot])
        else {
            warn!("tool not found: {name}");
            let err = Error::not_found()
                .with_reason(format!("Tool '{name}' not found."));
            return Box::pin(ready(err.to_string()));
        };

        trace!("invoking a tool ({name}) with args: {arguments}");
        let fut = tool.execute(arguments);
        Box::pin(
            async move {
                match fut.await {
                    Ok(output) => output,
                    Err(err) => {
                        debug!("tool returned an error: {err}");
                        err.to_string()
                    }
                }
            }
            .instrument(debug_span!("tool invoke", tool = name)),
        )
    }
}
