//! Phase transition history tracking.
//!
//! Keeps an in-memory, bounded record of the transitions a phase actor has
//! published. Histories are never written to disk; callers that want to keep
//! one can serialize the snapshot themselves.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single phase transition.
///
/// # Example
///
/// ```rust
/// use phaselight::core::StateTransition;
/// use phaselight::Phase;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: Phase::Red,
///     to: Phase::Green,
///     timestamp: Utc::now(),
///     sequence: 1,
/// };
/// assert_eq!(transition.sequence, 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The phase being left
    pub from: S,
    /// The phase being entered
    pub to: S,
    /// When the transition was published
    pub timestamp: DateTime<Utc>,
    /// 1-based position of this transition among all published by the actor
    pub sequence: u64,
}

/// Ordered, bounded history of phase transitions.
///
/// Once `limit` transitions are held, recording another evicts the oldest.
///
/// # Example
///
/// ```rust
/// use phaselight::core::{StateHistory, StateTransition};
/// use phaselight::Phase;
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
///
/// history.record(StateTransition {
///     from: Phase::Red,
///     to: Phase::Green,
///     timestamp: Utc::now(),
///     sequence: 1,
/// });
/// history.record(StateTransition {
///     from: Phase::Green,
///     to: Phase::Red,
///     timestamp: Utc::now(),
///     sequence: 2,
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::Red, &Phase::Green, &Phase::Red]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "", from = "StoredHistory<S>")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

/// Wire shape of a history, normalized on the way in.
#[derive(Deserialize)]
#[serde(bound = "")]
struct StoredHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> From<StoredHistory<S>> for StateHistory<S> {
    fn from(stored: StoredHistory<S>) -> Self {
        let limit = stored.limit.max(1);
        let mut transitions = stored.transitions;
        let excess = transitions.len().saturating_sub(limit);
        transitions.drain(..excess);
        Self { transitions, limit }
    }
}

/// Limit used by [`StateHistory::new`].
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding at most [`DEFAULT_HISTORY_LIMIT`] entries.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history holding at most `limit` entries.
    ///
    /// A limit of zero is raised to one.
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Maximum number of transitions retained.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of phases traversed.
    ///
    /// Returns the `from` of the oldest retained transition, then the `to`
    /// of each transition in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Gaps between consecutive retained transitions, oldest first.
    pub fn intervals(&self) -> Vec<Duration> {
        self.transitions
            .iter()
            .zip(self.transitions.iter().skip(1))
            .filter_map(|(a, b)| b.timestamp.signed_duration_since(a.timestamp).to_std().ok())
            .collect()
    }

    /// Iterate over retained transitions in order.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    /// Number of retained transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }
}
