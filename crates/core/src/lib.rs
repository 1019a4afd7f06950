//! Core logic including the reasoning loop, history store and tool calls.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
mod error;
pub mod memory;
mod model_client;
pub mod tool;

pub use agent::{Agent, AgentBuilder, DEFAULT_SYSTEM_PROMPT};
pub use error::BackendError;
