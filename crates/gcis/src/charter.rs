//! One-time clearance upgrade for reading the charter.
//!
//! Reading the charter to the end, after it has been open for the read
//! delay, moves a `public` profile to `registered`. A profile marker makes
//! this happen at most once. [`ReadTracker`] is the pure state machine;
//! [`CharterReader`] drives it from a timer and a stream of scroll events.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clearance::{ClearanceLevel, ClearanceStore};
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Storage key of the "already triggered" marker.
pub const CHARTER_INITIATED_KEY: &str = "gc_charter_initiated";

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadState {
    /// Waiting for the read delay to pass.
    #[default]
    Idle,
    /// Delay passed; waiting for the end of the charter to be in view.
    Armed,
    /// Upgrade done. Terminal.
    Triggered,
}

/// External events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEvent {
    /// The read delay elapsed. Carries whether the end of the charter is in view.
    TimerFired {
        /// End of content is in view.
        at_end: bool,
    },
    /// The reader scrolled.
    Scrolled {
        /// End of content is in view.
        at_end: bool,
    },
}

/// State machine for the charter read upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadTracker {
    state: ReadState,
}

impl ReadTracker {
    /// A tracker waiting for the read delay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that has already fired, for profiles with the marker set.
    #[must_use]
    pub fn triggered() -> Self {
        Self {
            state: ReadState::Triggered,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Feed an event. Returns `true` exactly once, on the transition into
    /// [`ReadState::Triggered`].
    pub fn handle(&mut self, event: ReadEvent) -> bool {
        let next = match (self.state, event) {
            (ReadState::Triggered, _) => return false,
            (ReadState::Idle, ReadEvent::Scrolled { .. }) => ReadState::Idle,
            (ReadState::Idle | ReadState::Armed, ReadEvent::TimerFired { at_end: false }) => {
                ReadState::Armed
            }
            (_, ReadEvent::TimerFired { at_end: true } | ReadEvent::Scrolled { at_end: true }) => {
                ReadState::Triggered
            }
            (ReadState::Armed, ReadEvent::Scrolled { at_end: false }) => ReadState::Armed,
        };
        self.state = next;
        next == ReadState::Triggered
    }
}

/// Whether the upgrade has already happened for this profile.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn already_initiated<S: KeyValueStore>(store: &S) -> Result<bool> {
    Ok(store.get(CHARTER_INITIATED_KEY)?.as_deref() == Some("true"))
}

/// Apply the upgrade: `public` becomes `registered` and the marker is set.
///
/// Returns the level after the upgrade.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn complete_reading<S: KeyValueStore>(clearance: &ClearanceStore<S>) -> Result<ClearanceLevel> {
    let mut level = clearance.get()?;
    if level == ClearanceLevel::Public {
        clearance.set(ClearanceLevel::Registered)?;
        level = ClearanceLevel::Registered;
        info!("Charter read, clearance upgraded to registered");
    }
    clearance.store().set(CHARTER_INITIATED_KEY, "true")?;
    Ok(level)
}

/// How a charter reading session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The marker was already set; nothing was armed.
    AlreadyInitiated,
    /// The upgrade fired. Carries the level afterwards.
    Completed(ClearanceLevel),
    /// The session ended before the upgrade fired.
    Abandoned,
}

/// Drives a [`ReadTracker`] from the read delay and scroll events.
#[derive(Debug)]
pub struct CharterReader<'a, S> {
    clearance: &'a ClearanceStore<S>,
    delay: Duration,
}

impl<'a, S: KeyValueStore> CharterReader<'a, S> {
    /// Create a reader for `clearance` with the given read delay.
    pub fn new(clearance: &'a ClearanceStore<S>, delay: Duration) -> Self {
        Self { clearance, delay }
    }

    /// Run one reading session.
    ///
    /// `at_end` says whether the end of the charter is in view when the
    /// session starts. Each scroll event carries the same flag. The scroll
    /// stream is dropped as soon as the upgrade fires. If the stream closes
    /// the session still waits for the delay and then checks the last known
    /// position once. If the stream closes after the delay the session is
    /// abandoned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn run(
        &self,
        mut at_end: bool,
        mut scrolls: mpsc::Receiver<bool>,
    ) -> Result<ReadOutcome> {
        if already_initiated(self.clearance.store())? {
            debug!("Charter already initiated, not arming");
            return Ok(ReadOutcome::AlreadyInitiated);
        }

        let mut tracker = ReadTracker::new();
        let timer = tokio::time::sleep(self.delay);
        tokio::pin!(timer);
        let mut timer_pending = true;
        let mut scrolls_open = true;

        loop {
            let event = tokio::select! {
                () = &mut timer, if timer_pending => {
                    timer_pending = false;
                    ReadEvent::TimerFired { at_end }
                }
                scrolled = scrolls.recv(), if scrolls_open => match scrolled {
                    Some(position) => {
                        at_end = position;
                        ReadEvent::Scrolled { at_end }
                    }
                    None => {
                        scrolls_open = false;
                        continue;
                    }
                },
                else => return Ok(ReadOutcome::Abandoned),
            };

            if tracker.handle(event) {
                drop(scrolls);
                let level = complete_reading(self.clearance)?;
                return Ok(ReadOutcome::Completed(level));
            }
            if !scrolls_open && !timer_pending {
                return Ok(ReadOutcome::Abandoned);
            }
        }
    }
}
