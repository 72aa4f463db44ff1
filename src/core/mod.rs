//! Core phase types and logic.
//!
//! This module contains the pure pieces the actor is built from:
//! - Phase definitions via the `State` trait and the `state_enum!` macro
//! - Guard predicates that end a wait
//! - Bounded, in-memory transition history
//!
//! Nothing in here spawns threads or blocks.

mod guard;
mod history;
mod macros;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
