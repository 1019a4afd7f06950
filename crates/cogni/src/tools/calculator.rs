use std::future::ready;

use cogni_core::tool::{Error as ToolError, Tool, ToolResult};

/// A tool that evaluates one binary arithmetic operation.
///
/// The input must be `<number> <operator> <number>` separated by
/// whitespace, where the operator is one of `+`, `-`, `*` and `/`. The
/// result is always formatted as a float, e.g. `2 + 3` gives `5.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    /// Creates a calculator tool.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Useful for when you need to answer questions about math. \
        Input should be a simple binary operation like '5 * 3' or '10 / 2'."
    }

    fn run(
        &self,
        input: String,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        ready(evaluate(&input).map(|value| format!("{value:?}")))
    }
}

fn evaluate(input: &str) -> Result<f64, ToolError> {
    let invalid_format = || {
        ToolError::invalid_input().with_reason(
            "Invalid input format. Expected 'number operator number'.",
        )
    };

    let parts: Vec<_> = input.split_whitespace().collect();
    let [lhs, op, rhs] = parts[..] else {
        return Err(invalid_format());
    };
    let (Ok(lhs), Ok(rhs)) = (lhs.parse::<f64>(), rhs.parse::<f64>()) else {
        return Err(invalid_format());
    };

    match op {
        "+" => Ok(lhs + rhs),
        "-" => Ok(lhs - rhs),
        "*" => Ok(lhs * rhs),
        "/" if rhs == 0.0 => Err(ToolError::execution_error()
            .with_reason("Division by zero is not allowed.")),
        "/" => Ok(lhs / rhs),
        _ => Err(ToolError::invalid_input().with_reason(format!(
            "Invalid operator '{op}'. Supported operators are +, -, *, /."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use cogni_core::tool::ErrorKind;

    use super::*;

    async fn run(input: &str) -> String {
        match CalculatorTool::new().run(input.to_owned()).await {
            Ok(output) => output,
            Err(err) => err.to_string(),
        }
    }

    #[tokio::test]
    async fn test_arithmetic() {
        assert_eq!(run("2 + 3").await, "5.0");
        assert_eq!(run("10.5 + 5").await, "15.5");
        assert_eq!(run("10 - 4").await, "6.0");
        assert_eq!(run("5 * 5").await, "25.0");
        assert_eq!(run("20 / 4").await, "5.0");
        assert_eq!(run("  -3   *  2 ").await, "-6.0");
    }

    #[tokio::test]
    async fn test_invalid_operator() {
        assert!(run("5 ^ 2").await.contains("Error: Invalid operator"));
    }

    #[tokio::test]
    async fn test_invalid_format() {
        for input in ["five plus three", "5 +", "1 + 2 + 3", ""] {
            let output = run(input).await;
            assert!(output.contains("Error: Invalid input format"), "{input}");
        }
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate("1 / 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
        assert_eq!(err.to_string(), "Error: Division by zero is not allowed.");
    }
}
