//! Phaselight: a blocking handoff queue and a timer-driven phase actor
//!
//! A traffic light flips between red and green on a randomized interval.
//! Every change is published into a condvar-backed queue, and any thread can
//! block until the phase it is waiting for comes through.
//!
//! # Core Concepts
//!
//! - **Queue**: unbounded `Mutex` + `Condvar` handoff buffer, LIFO by default
//! - **Phase actor**: owns the current phase and runs the toggle loop
//! - **State**: cyclic phase values declared with `state_enum!`
//! - **Config**: validated timing knobs, loadable from JSON
//!
//! # Example
//!
//! ```rust
//! use phaselight::config::CycleConfig;
//! use phaselight::{Phase, TrafficLight};
//! use std::time::Duration;
//!
//! let config = CycleConfig::builder()
//!     .cycle(Duration::from_millis(10), Duration::from_millis(20))
//!     .build()
//!     .unwrap();
//!
//! let light = TrafficLight::with_config(Phase::Red, config).unwrap();
//! light.simulate().unwrap();
//! light.wait_for_green().unwrap();
//! light.shutdown().unwrap();
//!
//! let history = light.history();
//! assert_eq!(history.get_path()[0], &Phase::Red);
//! ```

pub mod config;
pub mod core;
pub mod light;
pub mod queue;

// Re-export commonly used types
pub use config::{CycleConfig, ElapsedPrecision};
pub use crate::core::{Guard, State, StateHistory, StateTransition};
pub use light::{LightError, Phase, PhaseActor, TrafficLight};
pub use queue::{MessageQueue, QueueError, RetrievalOrder};
