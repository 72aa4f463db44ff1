//! Phase actors and the traffic light built on them.
//!
//! A [`PhaseActor`] owns its current phase and one [`MessageQueue`]. Its
//! toggle loop is the only writer: it flips the phase on a randomized timer
//! and publishes the new value, while callers block in
//! [`wait_for`](PhaseActor::wait_for) until the phase they want shows up.
//!
//! [`MessageQueue`]: crate::queue::MessageQueue

mod actor;
mod error;
mod phase;
mod timer;

pub use actor::{PhaseActor, TrafficLight};
pub use error::LightError;
pub use phase::Phase;
