mod builder;
mod turn;

use cogni_model::Entry;

use crate::memory::Memory;
use crate::model_client::ModelClient;
use crate::tool::Registry;
pub use builder::AgentBuilder;

/// The system prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// An agent instance, which owns a history, a model client and a set of
/// tools.
///
/// The agent drives one user turn at a time, see [`Agent::chat`]. It owns
/// its history exclusively, so two turns can never interleave on the same
/// agent.
pub struct Agent {
    model_client: ModelClient,
    registry: Registry,
    memory: Box<dyn Memory>,
    system_prompt: String,
    parallel_tool_calls: bool,
}

impl Agent {
    /// Returns the configured system prompt.
    #[inline]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Returns the tools available to the model.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns a snapshot of the conversation history.
    #[inline]
    pub fn history(&self) -> Vec<Entry> {
        self.memory.snapshot()
    }

    /// Clears the history and seeds it with the system prompt again.
    pub fn reset(&mut self) {
        debug!("resetting history");
        self.memory.clear();
        self.memory.append(Entry::system(self.system_prompt.clone()));
    }
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            model_client,
            registry,
            memory,
            system_prompt,
            parallel_tool_calls,
        } = builder;

        let mut agent = Agent {
            model_client,
            registry,
            memory,
            system_prompt,
            parallel_tool_calls,
        };
        agent.reset();
        agent
    }
}
