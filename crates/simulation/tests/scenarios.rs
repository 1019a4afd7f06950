use std::future::ready;

use cogni_core::tool::{Error as ToolError, Tool, ToolResult};
use cogni_core::{Agent, AgentBuilder};
use cogni_model::{ErrorKind, Role};
use cogni_simulation::{
    Assertion, ResponseContains, Scenario, Simulator, ToolUsed,
    WellFormedHistory,
};
use cogni_test_model::{PresetResponse, TestModelProvider, single_input_call};

/// Multiplies two integers written as `a * b`.
struct Multiplier;

impl Tool for Multiplier {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Multiplies two integers"
    }

    fn run(
        &self,
        input: String,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let product = input
            .split_once('*')
            .and_then(|(a, b)| {
                let a = a.trim().parse::<i64>().ok()?;
                let b = b.trim().parse::<i64>().ok()?;
                Some((a * b).to_string())
            })
            .ok_or_else(|| {
                ToolError::invalid_input().with_reason("Not a product")
            });
        ready(product)
    }
}

fn math_scenario() -> Scenario {
    Scenario::new("Successful Tool Use")
        .with_step("What is 4 * 8?")
        .with_assertion(ToolUsed::new("calculator"))
        .with_assertion(ResponseContains::new("32"))
        .with_assertion(WellFormedHistory)
}

fn greeting_scenario() -> Scenario {
    Scenario::new("Small Talk")
        .with_step("Hi")
        .with_assertion(ToolUsed::new("calculator"))
        .with_assertion(ResponseContains::new("world"))
}

fn script_math(provider: &TestModelProvider) {
    provider.add_response(PresetResponse::with_tool_calls([single_input_call(
        "call_abc",
        "calculator",
        "4 * 8",
    )]));
    provider.add_response(PresetResponse::text("Of course. 4 times 8 is 32."));
}

fn script_greeting(provider: &TestModelProvider) {
    provider.add_response(PresetResponse::text("Hello there!"));
}

fn build_agent(provider: &TestModelProvider) -> Agent {
    AgentBuilder::with_model_provider(provider.clone())
        .with_tool(Multiplier)
        .build()
}

#[tokio::test]
async fn test_tool_scenario_passes() {
    let provider = TestModelProvider::default();
    script_math(&provider);
    let mut agent = build_agent(&provider);

    let results = Simulator::new()
        .run(&mut agent, &[math_scenario()])
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.scenario_name(), "Successful Tool Use");
    assert!(result.passed());
    assert_eq!(result.assertion("tool_used(calculator)"), Some(true));
    assert_eq!(result.assertion(r#"response_contains("32")"#), Some(true));

    let history = result.final_history();
    assert_eq!(history.len(), 5);
    assert_eq!(history[3].role(), Role::Tool);
    assert_eq!(history[3].content(), Some("32"));
}

#[tokio::test]
async fn test_text_scenario_fails() {
    let provider = TestModelProvider::default();
    script_greeting(&provider);
    let mut agent = build_agent(&provider);

    let results = Simulator::new()
        .run(&mut agent, &[greeting_scenario()])
        .await
        .unwrap();

    let result = &results[0];
    assert!(!result.passed());
    assert_eq!(result.final_history().len(), 3);
    assert_eq!(result.assertion("tool_used(calculator)"), Some(false));
    assert_eq!(result.assertion(r#"response_contains("world")"#), Some(false));
}

#[tokio::test]
async fn test_empty_assertions_always_pass() {
    let provider = TestModelProvider::default();
    script_greeting(&provider);
    let mut agent = build_agent(&provider);

    let results = Simulator::new()
        .run(&mut agent, &[Scenario::new("Anything goes").with_step("Hi")])
        .await
        .unwrap();
    assert!(results[0].passed());
    assert!(results[0].assertion_results().is_empty());
}

#[tokio::test]
async fn test_scenarios_do_not_share_history() {
    // Tool scenario first.
    let provider = TestModelProvider::default();
    script_math(&provider);
    script_greeting(&provider);
    let mut agent = build_agent(&provider);
    let results = Simulator::new()
        .run(&mut agent, &[math_scenario(), greeting_scenario()])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].passed());
    assert!(!results[1].passed());
    assert_eq!(results[1].assertion("tool_used(calculator)"), Some(false));
    assert_eq!(results[1].final_history().len(), 3);

    // Tool scenario second.
    let provider = TestModelProvider::default();
    script_greeting(&provider);
    script_math(&provider);
    let mut agent = build_agent(&provider);
    let results = Simulator::new()
        .run(&mut agent, &[greeting_scenario(), math_scenario()])
        .await
        .unwrap();
    assert_eq!(results[0].scenario_name(), "Small Talk");
    assert_eq!(results[0].assertion("tool_used(calculator)"), Some(false));
    assert!(results[1].passed());
    assert_eq!(results[1].final_history().len(), 5);

    // Every scenario started from a single system entry.
    for request in provider.requests() {
        assert_eq!(request.entries[0].role(), Role::System);
        assert_eq!(request.entries[1].role(), Role::User);
        assert_eq!(
            request
                .entries
                .iter()
                .filter(|entry| entry.role() == Role::User)
                .count(),
            1
        );
    }
}

#[tokio::test]
async fn test_multi_step_scenario() {
    let provider = TestModelProvider::default();
    script_math(&provider);
    provider.add_response(PresetResponse::text("You're welcome!"));
    let mut agent = build_agent(&provider);

    let scenario = Scenario::new("Math then thanks")
        .with_steps(["What is 4 * 8?", "Thanks"])
        .with_assertion(ToolUsed::new("calculator"))
        .with_assertion(ResponseContains::new("WELCOME"))
        .with_assertion(ResponseContains::new("32"))
        .with_assertion(WellFormedHistory);
    let results = Simulator::new().run(&mut agent, &[scenario]).await.unwrap();

    let result = &results[0];
    assert_eq!(result.final_history().len(), 7);
    // Tool use anywhere counts, but only the last reply is checked.
    assert_eq!(result.assertion("tool_used(calculator)"), Some(true));
    assert_eq!(result.assertion(r#"response_contains("WELCOME")"#), Some(true));
    assert_eq!(result.assertion(r#"response_contains("32")"#), Some(false));
    assert!(!result.passed());
}

#[tokio::test]
async fn test_assertions_do_not_mutate_history() {
    let provider = TestModelProvider::default();
    script_math(&provider);
    let mut agent = build_agent(&provider);
    agent.chat("What is 4 * 8?").await.unwrap();

    let before = agent.history();
    let snapshot = agent.history();
    assert!(ToolUsed::new("calculator").evaluate(&snapshot));
    assert!(ResponseContains::new("32").evaluate(&snapshot));
    assert!(WellFormedHistory.evaluate(&snapshot));
    assert_eq!(agent.history(), before);
    assert_eq!(snapshot, before);
}

#[tokio::test]
async fn test_backend_failure_aborts_run() {
    let provider = TestModelProvider::default();
    script_greeting(&provider);
    provider.add_response(PresetResponse::text("Too late.").with_failures(0));
    let mut agent = build_agent(&provider);

    let scenarios = [
        greeting_scenario(),
        Scenario::new("Broken").with_steps(["First", "Second"]),
        math_scenario(),
    ];
    let err = Simulator::new()
        .run(&mut agent, &scenarios)
        .await
        .unwrap_err();
    assert_eq!(err.scenario(), "Broken");
    assert_eq!(err.step(), 0);
    assert!(err.to_string().contains("Broken"));

    let source = std::error::Error::source(&err).unwrap();
    let backend = source
        .downcast_ref::<cogni_core::BackendError>()
        .unwrap();
    assert_eq!(backend.kind(), ErrorKind::Other);
}

#[tokio::test]
async fn test_run_isolated() {
    let scenarios = [math_scenario(), greeting_scenario()];
    let results = Simulator::new()
        .run_isolated(
            || {
                // A fresh provider and script for every agent built.
                let provider = TestModelProvider::default();
                script_math(&provider);
                build_agent(&provider)
            },
            &scenarios[..1],
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].passed());

    let providers =
        [TestModelProvider::default(), TestModelProvider::default()];
    script_math(&providers[0]);
    script_greeting(&providers[1]);
    let next = std::cell::Cell::new(0);
    let results = Simulator::new()
        .run_isolated(
            || {
                let idx = next.get();
                next.set(idx + 1);
                build_agent(&providers[idx])
            },
            &scenarios,
        )
        .await
        .unwrap();
    assert_eq!(results[0].scenario_name(), "Successful Tool Use");
    assert!(results[0].passed());
    assert_eq!(results[1].scenario_name(), "Small Talk");
    assert!(!results[1].passed());
    assert_eq!(results[1].final_history().len(), 3);
}
