use cogni_model::ModelProvider;

use super::{Agent, DEFAULT_SYSTEM_PROMPT};
use crate::memory::{Memory, VolatileMemory};
use crate::model_client::ModelClient;
use crate::tool::{Registry, Tool};

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) registry: Registry,
    pub(crate) memory: Box<dyn Memory>,
    pub(crate) system_prompt: String,
    pub(crate) parallel_tool_calls: bool,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            registry: Registry::new(),
            memory: Box::new(VolatileMemory::new()),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            parallel_tool_calls: false,
        }
    }

    /// Sets the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Replaces the default in-memory history store.
    ///
    /// The memory is cleared when the agent is built.
    #[inline]
    pub fn with_memory<M: Memory + 'static>(mut self, memory: M) -> Self {
        self.memory = Box::new(memory);
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.registry.register(tool);
        self
    }

    /// Replaces all the registered tools with the given registry.
    #[inline]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Runs the tool calls of one decision concurrently.
    ///
    /// Results are still appended in the order they were requested.
    #[inline]
    pub fn with_parallel_tool_calls(mut self, enabled: bool) -> Self {
        self.parallel_tool_calls = enabled;
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
