//! Guard predicates for selecting which published phase ends a wait.
//!
//! Guards are pure boolean functions over a phase. A waiter drains the
//! handoff queue until a received phase satisfies its guard.

use super::state::State;
use std::marker::PhantomData;

/// Pure predicate that decides whether a received phase ends a wait.
///
/// # Example
///
/// ```rust
/// use phaselight::core::Guard;
/// use phaselight::Phase;
///
/// let is_green = Guard::new(|p: &Phase| *p == Phase::Green);
///
/// assert!(is_green.check(&Phase::Green));
/// assert!(!is_green.check(&Phase::Red));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync),
    /// since waits may run on any thread.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that only accepts `target`.
    pub fn equals(target: S) -> Self {
        Self::new(move |s| *s == target)
    }

    /// Check if the guard accepts this phase.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}
