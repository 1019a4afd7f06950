use std::error::Error;
use std::fmt::{self, Display};

use cogni_core::{Agent, BackendError};
use cogni_model::Entry;
use futures_util::future::join_all;
use serde::Serialize;
use tracing::Instrument;

use crate::Scenario;

/// The outcome of one assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssertionOutcome {
    /// The assertion identity, see [`Assertion::id`](crate::Assertion::id).
    pub assertion: String,
    /// Whether the assertion passed.
    pub passed: bool,
}

/// The result of simulating one scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    scenario_name: String,
    passed: bool,
    assertion_results: Vec<AssertionOutcome>,
    final_history: Vec<Entry>,
}

impl SimulationResult {
    /// Returns the name of the scenario.
    #[inline]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    /// Returns `true` if all assertions passed.
    #[inline]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Returns the assertion outcomes, in the order the assertions were
    /// declared.
    #[inline]
    pub fn assertion_results(&self) -> &[AssertionOutcome] {
        &self.assertion_results
    }

    /// Looks up the outcome of an assertion by its identity.
    #[inline]
    pub fn assertion(&self, id: &str) -> Option<bool> {
        self.assertion_results
            .iter()
            .find(|outcome| outcome.assertion == id)
            .map(|outcome| outcome.passed)
    }

    /// Returns the history after the last step.
    #[inline]
    pub fn final_history(&self) -> &[Entry] {
        &self.final_history
    }
}

/// The error returned when a scenario cannot be played to the end.
#[derive(Debug)]
pub struct SimulationError {
    scenario: String,
    step: usize,
    source: BackendError,
}

impl SimulationError {
    /// Returns the name of the failed scenario.
    #[inline]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Returns the zero-based index of the failed step.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scenario '{}' failed at step {}: {}",
            self.scenario, self.step, self.source
        )
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Runs scenarios against agents and reports the results.
#[derive(Clone, Copy, Debug, Default)]
pub struct Simulator;

impl Simulator {
    /// Creates a simulator.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Runs the scenarios one after another on the same agent.
    ///
    /// The agent history is reset before each scenario, so scenarios never
    /// see each other's entries. Results are in scenario order.
    ///
    /// # Errors
    ///
    /// Stops at the first backend failure.
    pub async fn run(
        &self,
        agent: &mut Agent,
        scenarios: &[Scenario],
    ) -> Result<Vec<SimulationResult>, SimulationError> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(run_scenario(agent, scenario).await?);
        }
        Ok(results)
    }

    /// Runs every scenario on its own agent, built by `make_agent`, with
    /// all the scenarios in flight concurrently.
    ///
    /// Results are still in scenario order.
    ///
    /// # Errors
    ///
    /// Returns the first failure in scenario order, after all scenarios
    /// have finished.
    pub async fn run_isolated<F>(
        &self,
        make_agent: F,
        scenarios: &[Scenario],
    ) -> Result<Vec<SimulationResult>, SimulationError>
    where
        F: Fn() -> Agent,
    {
        let runs = scenarios.iter().map(|scenario| {
            let mut agent = make_agent();
            async move { run_scenario(&mut agent, scenario).await }
        });
        join_all(runs).await.into_iter().collect()
    }
}

async fn run_scenario(
    agent: &mut Agent,
    scenario: &Scenario,
) -> Result<SimulationResult, SimulationError> {
    let span = info_span!("scenario", name = scenario.name());
    async move {
        agent.reset();
        for (step, input) in scenario.steps().iter().enumerate() {
            trace!("step {step}: {input}");
            if let Err(source) = agent.chat(input.as_str()).await {
                error!("step {step} failed: {source}");
                return Err(SimulationError {
                    scenario: scenario.name().to_owned(),
                    step,
                    source,
                });
            }
        }

        let result = score(scenario, agent.history());
        if result.passed {
            info!("passed");
        } else {
            info!("failed");
        }
        Ok(result)
    }
    .instrument(span)
    .await
}

fn score(scenario: &Scenario, final_history: Vec<Entry>) -> SimulationResult {
    let assertion_results: Vec<_> = scenario
        .assertions()
        .iter()
        .map(|assertion| AssertionOutcome {
            assertion: assertion.id(),
            passed: assertion.evaluate(&final_history),
        })
        .collect();
    let passed = assertion_results.iter().all(|outcome| outcome.passed);

    SimulationResult {
        scenario_name: scenario.name().to_owned(),
        passed,
        assertion_results,
        final_history,
    }
}

#[cfg(test)]
mod tests {
    use cogni_model::Role;

    use super::*;
    use crate::{Assertion, ResponseContains};

    /// Passes if the history has exactly this many entries.
    struct LengthIs(usize);

    impl Assertion for LengthIs {
        fn id(&self) -> String {
            format!("length_is({})", self.0)
        }

        fn evaluate(&self, history: &[Entry]) -> bool {
            history.len() == self.0
        }
    }

    fn history() -> Vec<Entry> {
        vec![Entry::system("Be nice."), Entry::user("Hi")]
    }

    #[test]
    fn test_score_all_must_pass() {
        let scenario = Scenario::new("Mixed")
            .with_assertion(LengthIs(2))
            .with_assertion(ResponseContains::new("hello"));
        let result = score(&scenario, history());
        assert!(!result.passed());
        assert_eq!(result.assertion("length_is(2)"), Some(true));
        assert_eq!(
            result.assertion(r#"response_contains("hello")"#),
            Some(false)
        );
        assert_eq!(result.assertion("missing"), None);
        assert_eq!(result.final_history()[1].role(), Role::User);
    }

    #[test]
    fn test_score_empty_assertions_pass() {
        let result = score(&Scenario::new("Empty"), history());
        assert!(result.passed());
        assert!(result.assertion_results().is_empty());
        assert_eq!(result.scenario_name(), "Empty");
    }

    #[test]
    fn test_score_does_not_short_circuit() {
        let scenario = Scenario::new("All evaluated")
            .with_assertion(LengthIs(5))
            .with_assertion(LengthIs(2))
            .with_assertion(LengthIs(7));
        let result = score(&scenario, history());
        let outcomes: Vec<_> =
            result.assertion_results().iter().map(|o| o.passed).collect();
        assert_eq!(outcomes, [false, true, false]);
    }
}
