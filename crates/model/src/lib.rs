//! The shared data model and the completion backend contract.
//!
//! This crate establishes an unified protocol between the reasoning loop
//! and the language model backends, so that the agent can switch between
//! them without modifying the core codebase.
//!
//! Types in this crate don't define any orchestration behavior, instead
//! they are the constraints that backend implementors and memory
//! implementors should adhere to.

#![deny(missing_docs)]

mod entry;
mod error;
mod opaque;
mod provider;
mod request;
mod response;

pub use entry::*;
pub use error::*;
pub use opaque::*;
pub use provider::*;
pub use request::*;
pub use response::*;
