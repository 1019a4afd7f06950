//! A set of built-in tools that models can use.

mod calculator;

pub use calculator::CalculatorTool;
