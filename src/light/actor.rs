//! Phase actor: a phase holder with a background toggle loop.

use super::error::LightError;
use super::phase::Phase;
use super::timer::CycleTimer;
use crate::config::CycleConfig;
use crate::core::{Guard, State, StateHistory, StateTransition};
use crate::queue::{MessageQueue, QueueError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// A traffic light: a [`PhaseActor`] cycling between red and green.
pub type TrafficLight = PhaseActor<Phase>;

struct Shared<S: State> {
    id: Uuid,
    current: AtomicUsize,
    queue: MessageQueue<S>,
    history: Mutex<StateHistory<S>>,
    config: CycleConfig,
    stop: AtomicBool,
}

impl<S: State> Shared<S> {
    fn phase(&self) -> S {
        S::from_index(self.current.load(Ordering::Acquire))
            .expect("stored phase index is always produced by State::index")
    }
}

/// Holds the current phase and publishes every change into a handoff queue.
///
/// The actor is idle until [`simulate`](Self::simulate) starts its toggle
/// loop on a background thread. The loop flips the phase once per randomly
/// drawn cycle and sends the new phase to the queue, where any number of
/// threads can wait for it. [`shutdown`](Self::shutdown), or dropping the
/// actor, stops and joins the loop.
///
/// # Example
///
/// ```rust
/// use phaselight::config::CycleConfig;
/// use phaselight::{Phase, TrafficLight};
/// use std::time::Duration;
///
/// let config = CycleConfig::builder()
///     .cycle(Duration::from_millis(200), Duration::from_millis(300))
///     .build()
///     .unwrap();
/// let light = TrafficLight::with_config(Phase::Red, config).unwrap();
/// assert_eq!(light.current_phase(), Phase::Red);
///
/// light.simulate().unwrap();
/// light.wait_for_green().unwrap();
/// assert_eq!(light.current_phase(), Phase::Green);
///
/// light.shutdown().unwrap();
/// ```
pub struct PhaseActor<S: State> {
    shared: Arc<Shared<S>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    running: AtomicBool,
}

impl<S: State> PhaseActor<S> {
    /// Create an idle actor in `initial` with the default configuration.
    pub fn new(initial: S) -> Self {
        Self::build(initial, CycleConfig::default())
    }

    /// Create an idle actor in `initial`, validating `config` first.
    pub fn with_config(initial: S, config: CycleConfig) -> Result<Self, LightError> {
        config.check()?;
        Ok(Self::build(initial, config))
    }

    fn build(initial: S, config: CycleConfig) -> Self {
        let queue = MessageQueue::with_order(config.order).with_send_delay(config.send_delay());
        let shared = Shared {
            id: Uuid::new_v4(),
            current: AtomicUsize::new(initial.index()),
            queue,
            history: Mutex::new(StateHistory::with_limit(config.history_limit)),
            config,
            stop: AtomicBool::new(false),
        };
        Self {
            shared: Arc::new(shared),
            worker: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn config(&self) -> &CycleConfig {
        &self.shared.config
    }

    /// Current phase. Never blocks.
    pub fn current_phase(&self) -> S {
        self.shared.phase()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Snapshot of the transitions published so far.
    pub fn history(&self) -> StateHistory<S> {
        self.shared
            .history
            .lock()
            .expect("phase history lock poisoned")
            .clone()
    }

    /// Start the toggle loop on a background thread.
    ///
    /// Only one loop runs per actor: a second call fails with
    /// [`LightError::AlreadyRunning`], and a call after shutdown fails with
    /// [`LightError::Stopped`].
    pub fn simulate(&self) -> Result<(), LightError> {
        let mut worker = self.worker.lock().expect("worker handle lock poisoned");
        if self.shared.stop.load(Ordering::Acquire) {
            return Err(LightError::Stopped);
        }
        if self.running.load(Ordering::Acquire) {
            return Err(LightError::AlreadyRunning);
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(format!("phaselight-{}", self.shared.id.simple()))
            .spawn(move || run_toggle_loop(shared))
            .map_err(LightError::Spawn)?;
        *worker = Some(handle);
        self.running.store(true, Ordering::Release);

        info!(
            light = %self.shared.id,
            phase = self.current_phase().name(),
            "toggle loop started"
        );
        Ok(())
    }

    /// Stop the toggle loop and release every blocked waiter.
    ///
    /// Waits in progress return [`LightError::Stopped`]. Succeeds without
    /// joining anything when the loop was never started; calling it twice is
    /// harmless.
    pub fn shutdown(&self) -> Result<(), LightError> {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.queue.close();

        let handle = {
            let mut worker = self.worker.lock().expect("worker handle lock poisoned");
            let handle = worker.take();
            if handle.is_none() {
                self.running.store(false, Ordering::Release);
            }
            handle
        };
        let Some(handle) = handle else {
            return Ok(());
        };

        let joined = handle.join();
        self.running.store(false, Ordering::Release);
        match joined {
            Ok(()) => {
                info!(light = %self.shared.id, "toggle loop stopped");
                Ok(())
            }
            Err(_) => {
                warn!(light = %self.shared.id, "toggle loop thread panicked");
                Err(LightError::WorkerPanicked)
            }
        }
    }

    /// Block until `guard` accepts a published phase, and return that phase.
    ///
    /// Phases buffered before the call are discarded first, so only
    /// transitions published while waiting are considered. Concurrent waiters
    /// compete for the same items, and that initial discard can consume a
    /// phase published just before another waiter woke for it. A waiter that
    /// loses a phase this way keeps blocking until the next matching one.
    pub fn wait_until(&self, guard: &Guard<S>) -> Result<S, LightError> {
        let queue = &self.shared.queue;
        while let Some(stale) = queue.try_receive() {
            trace!(light = %self.shared.id, phase = stale.name(), "dropping buffered phase");
        }

        loop {
            let phase = queue.receive().map_err(|QueueError::Closed| LightError::Stopped)?;
            if guard.check(&phase) {
                return Ok(phase);
            }
            trace!(light = %self.shared.id, phase = phase.name(), "discarding phase");
        }
    }

    /// Block until `target` is published.
    pub fn wait_for(&self, target: S) -> Result<S, LightError> {
        self.wait_until(&Guard::equals(target))
    }
}

impl PhaseActor<Phase> {
    /// Block until the light turns green.
    pub fn wait_for_green(&self) -> Result<(), LightError> {
        self.wait_for(Phase::Green).map(|_| ())
    }
}

impl Default for PhaseActor<Phase> {
    fn default() -> Self {
        Self::new(Phase::default())
    }
}

impl<S: State> Drop for PhaseActor<S> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(light = %self.shared.id, error = %err, "shutdown on drop failed");
        }
    }
}

fn run_toggle_loop<S: State>(shared: Arc<Shared<S>>) {
    let config = &shared.config;
    let poll_interval = config.poll_interval();
    let mut rng = rand::rng();
    let mut timer = CycleTimer::start(config, Instant::now(), &mut rng);
    let mut sequence: u64 = 0;

    while !shared.stop.load(Ordering::Acquire) {
        if timer.is_due(Instant::now()) {
            sequence += 1;
            let from = shared.phase();
            let to = from.next();
            shared.current.store(to.index(), Ordering::Release);
            shared
                .history
                .lock()
                .expect("phase history lock poisoned")
                .record(StateTransition {
                    from: from.clone(),
                    to: to.clone(),
                    timestamp: Utc::now(),
                    sequence,
                });

            debug!(
                light = %shared.id,
                from = from.name(),
                to = to.name(),
                sequence,
                interval_ms = u64::try_from(timer.target().as_millis()).unwrap_or(u64::MAX),
                "phase changed"
            );

            if shared.queue.send(to).is_err() {
                debug!(light = %shared.id, "queue closed, leaving toggle loop");
                break;
            }
            timer.restart(Instant::now(), &mut rng);
        }
        thread::sleep(poll_interval);
    }
}
