//! Core State trait for cyclic phase values.
//!
//! Phases are small closed enums that repeat in a fixed order. The trait
//! exposes pure methods for naming a phase, stepping to its successor and
//! encoding it densely so it can live inside an atomic.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for cyclic phase values.
///
/// All methods are pure - no side effects. A phase is an immutable value
/// describing where a signal currently is in its cycle.
///
/// # Required Traits
///
/// - `Clone`: phases are copied into the handoff queue and the history
/// - `PartialEq`: waiters compare received phases against a target
/// - `Debug`: phases show up in log fields
/// - `Serialize` + `Deserialize`: histories can be exported as JSON
///
/// # Example
///
/// ```rust
/// use phaselight::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     On,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
///
///     fn index(&self) -> usize {
///         match self {
///             Self::Off => 0,
///             Self::On => 1,
///         }
///     }
///
///     fn from_index(index: usize) -> Option<Self> {
///         match index {
///             0 => Some(Self::Off),
///             1 => Some(Self::On),
///             _ => None,
///         }
///     }
///
///     fn next(&self) -> Self {
///         match self {
///             Self::Off => Self::On,
///             Self::On => Self::Off,
///         }
///     }
/// }
///
/// assert_eq!(Lamp::Off.next(), Lamp::On);
/// assert_eq!(Lamp::from_index(Lamp::On.index()), Some(Lamp::On));
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the phase's name for display/logging.
    fn name(&self) -> &str;

    /// Dense position of this phase in its cycle, starting at zero.
    fn index(&self) -> usize;

    /// Inverse of [`State::index`]. Returns `None` for out of range values.
    fn from_index(index: usize) -> Option<Self>;

    /// The phase that follows this one. The last phase wraps to the first.
    fn next(&self) -> Self;
}
