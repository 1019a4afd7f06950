//! Scenario-based behavioral evaluation of agents.
//!
//! A [`Scenario`] is a scripted sequence of user turns plus a set of
//! [`Assertion`]s. The [`Simulator`] replays the turns against an agent
//! with a fresh history, and scores the final history against the
//! assertions.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod assertion;
mod runner;
mod scenario;

pub use assertion::{Assertion, ResponseContains, ToolUsed, WellFormedHistory};
pub use runner::{
    AssertionOutcome, SimulationError, SimulationResult, Simulator,
};
pub use scenario::{AssertionDef, Scenario, ScenarioDef, load_scenarios};
