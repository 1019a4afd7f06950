//! An out-of-the-box agent that assembles the built-in tools and a model
//! provider.
//!
//! The crate includes a CLI tool for chatting in the terminal and for
//! running scenario files. And you can also use it as a library to bring
//! the agent into your own host apps.

#![deny(missing_docs)]

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`cogni_core`] crate.
pub mod core {
    pub use cogni_core::*;
}

/// Re-exports of [`cogni_simulation`] crate.
pub mod simulation {
    pub use cogni_simulation::*;
}
