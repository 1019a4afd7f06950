use cogni_model::{Decision, Entry, ModelRequest, ToolCallRequest, ToolEntry};
use futures_util::future::join_all;
use tracing::Instrument;

use super::Agent;
use crate::BackendError;

/// The stages of one user turn.
///
/// A turn either goes `AwaitingDecision -> Done`, or takes exactly one tool
/// round-trip: `AwaitingDecision -> ExecutingTools ->
/// AwaitingFinalDecision -> Done`.
#[derive(Debug)]
enum TurnStage {
    AwaitingDecision,
    ExecutingTools(Vec<ToolCallRequest>),
    AwaitingFinalDecision,
    Done(Option<String>),
}

impl Agent {
    /// Drives one user turn to completion and returns the final text.
    ///
    /// The user input is appended first, then the model is asked for a
    /// decision. If the decision requests tools, they are executed, their
    /// outputs are appended in request order, and the model is asked for
    /// exactly one more decision, which is final: tools it requests are
    /// stored in the history but never executed.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend fails. Entries appended
    /// earlier in the same turn are kept.
    pub async fn chat<S: Into<String>>(
        &mut self,
        input: S,
    ) -> Result<Option<String>, BackendError> {
        let input = input.into();
        self.run_turn(input)
            .instrument(debug_span!("agent turn"))
            .await
    }

    async fn run_turn(
        &mut self,
        input: String,
    ) -> Result<Option<String>, BackendError> {
        self.memory.append(Entry::user(input));

        let mut stage = TurnStage::AwaitingDecision;
        loop {
            trace!("turn stage: {stage:?}");
            stage = match stage {
                TurnStage::AwaitingDecision => {
                    let decision = self.request_decision().await?;
                    if decision.has_tool_calls() {
                        TurnStage::ExecutingTools(decision.tool_calls)
                    } else {
                        TurnStage::Done(decision.content)
                    }
                }
                TurnStage::ExecutingTools(tool_calls) => {
                    self.execute_tools(tool_calls).await;
                    TurnStage::AwaitingFinalDecision
                }
                TurnStage::AwaitingFinalDecision => {
                    let decision = self.request_decision().await?;
                    if decision.has_tool_calls() {
                        warn!(
                            "ignoring {} tool call(s) requested after the \
                             tool round",
                            decision.tool_calls.len()
                        );
                    }
                    TurnStage::Done(decision.content)
                }
                TurnStage::Done(content) => return Ok(content),
            };
        }
    }

    /// Requests a decision over the current history and appends it.
    async fn request_decision(&mut self) -> Result<Decision, BackendError> {
        let request = ModelRequest {
            entries: self.memory.snapshot(),
            tools: self.registry.describe(),
        };
        let decision = self.model_client.complete(request).await?;

        self.memory.append(decision.clone().into_entry());
        Ok(decision)
    }

    async fn execute_tools(&mut self, tool_calls: Vec<ToolCallRequest>) {
        debug!("executing {} tool call(s)", tool_calls.len());

        if self.parallel_tool_calls {
            let outputs = join_all(tool_calls.iter().map(|call| {
                self.registry.invoke(&call.name, &call.arguments)
            }))
            .await;
            // `join_all` keeps the input order, no matter which call ends
            // first.
            for (call, output) in tool_calls.into_iter().zip(outputs) {
                self.append_tool_output(call, output);
            }
            return;
        }

        for call in tool_calls {
            let output =
                self.registry.invoke(&call.name, &call.arguments).await;
            self.append_tool_output(call, output);
        }
    }

    #[inline]
    fn append_tool_output(&mut self, call: ToolCallRequest, output: String) {
        self.memory.append(Entry::Tool(ToolEntry {
            tool_call_id: call.id,
            name: call.name,
            content: output,
        }));
    }
}
