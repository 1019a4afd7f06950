use cogni_core::{Agent, AgentBuilder, BackendError};
use cogni_model::{Entry, ModelProvider};
use cogni_simulation::{Scenario, SimulationError, SimulationResult, Simulator};

use crate::tools::*;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider);
        Self { agent_builder }
    }

    /// Sets the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.agent_builder = self.agent_builder.with_system_prompt(prompt);
        self
    }

    /// Runs the tool calls of one decision concurrently.
    #[inline]
    pub fn with_parallel_tool_calls(mut self, enabled: bool) -> Self {
        self.agent_builder =
            self.agent_builder.with_parallel_tool_calls(enabled);
        self
    }

    /// Builds a new session with the built-in tools registered.
    pub fn build(self) -> Session {
        let agent = self.agent_builder.with_tool(CalculatorTool::new()).build();
        Session { agent }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured agent that you can use directly, and it
/// is basically a wrapper around [`Agent`].
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Sends a message to the session and waits for the reply.
    #[inline]
    pub async fn send_message(
        &mut self,
        message: &str,
    ) -> Result<Option<String>, BackendError> {
        self.agent.chat(message).await
    }

    /// Returns a snapshot of the conversation so far.
    #[inline]
    pub fn history(&self) -> Vec<Entry> {
        self.agent.history()
    }

    /// Starts a new conversation.
    #[inline]
    pub fn reset(&mut self) {
        self.agent.reset();
    }

    /// Plays the scenarios against the session's agent.
    ///
    /// The conversation is reset before each scenario, and the session is
    /// left with the history of the last one.
    pub async fn simulate(
        &mut self,
        scenarios: &[Scenario],
    ) -> Result<Vec<SimulationResult>, SimulationError> {
        Simulator::new().run(&mut self.agent, scenarios).await
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}
