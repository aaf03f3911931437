//! The robot's shared intent.
//!
//! [`SharedIntent`] is the single source of truth every task reads. It is
//! written only by the command router; the LED renderer and the audio
//! sequencer poll it once per tick. Both fields live behind one lock and are
//! always copied out together, so a reader never sees the state from one
//! update paired with the completion flag from another.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

/// What the robot is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RobotState {
    #[default]
    Stationary,
    MovingForward,
    MovingBackward,
    MovingLeft,
    MovingRight,
    CurvingLeft,
    CurvingRight,
}

impl RobotState {
    /// Returns true for every state except `Stationary`.
    pub fn is_moving(self) -> bool {
        self != RobotState::Stationary
    }
}

/// A consistent snapshot of the shared intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Intent {
    /// Current robot state.
    pub state: RobotState,
    /// Set once the operator signals the run is done; cleared by the next
    /// motion command.
    pub complete: bool,
}

impl Intent {
    pub const fn new(state: RobotState, complete: bool) -> Self {
        Self { state, complete }
    }
}

impl From<Intent> for (RobotState, bool) {
    fn from(intent: Intent) -> Self {
        (intent.state, intent.complete)
    }
}

/// Lock-guarded robot intent shared between tasks.
///
/// Every method takes the lock exactly once and releases it before returning.
/// No method suspends or nests another lock while holding it, so waiting
/// indefinitely for the lock cannot deadlock.
///
/// # Type Parameters
/// * `M` - Raw mutex flavour, e.g. `CriticalSectionRawMutex` when tasks run
///   at different priorities, `ThreadModeRawMutex` for a single executor.
pub struct SharedIntent<M: RawMutex> {
    inner: Mutex<M, Cell<Intent>>,
}

impl<M: RawMutex> SharedIntent<M> {
    /// Creates an intent in `Stationary`, not complete.
    pub const fn new() -> Self {
        Self::with_intent(Intent::new(RobotState::Stationary, false))
    }

    /// Creates an intent with an explicit starting value.
    pub const fn with_intent(intent: Intent) -> Self {
        Self {
            inner: Mutex::new(Cell::new(intent)),
        }
    }

    /// Returns both fields, copied out under one lock hold.
    pub fn read(&self) -> Intent {
        self.inner.lock(|cell| cell.get())
    }

    /// Replaces both fields atomically.
    pub fn write(&self, state: RobotState, complete: bool) {
        self.inner.lock(|cell| cell.set(Intent::new(state, complete)));
    }

    /// Read-modify-write under a single lock hold.
    ///
    /// `f` runs inside the critical section and must not block. Returns the
    /// value that was stored.
    pub fn update(&self, f: impl FnOnce(Intent) -> Intent) -> Intent {
        self.inner.lock(|cell| {
            let next = f(cell.get());
            cell.set(next);
            next
        })
    }
}

impl<M: RawMutex> Default for SharedIntent<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn starts_stationary_and_incomplete() {
        let intent = SharedIntent::<NoopRawMutex>::new();
        assert_eq!(intent.read(), Intent::new(RobotState::Stationary, false));
    }

    #[test]
    fn write_replaces_both_fields() {
        let intent = SharedIntent::<NoopRawMutex>::new();
        intent.write(RobotState::CurvingLeft, true);

        let (state, complete) = intent.read().into();
        assert_eq!(state, RobotState::CurvingLeft);
        assert!(complete);
    }

    #[test]
    fn update_keeps_untouched_field() {
        let intent =
            SharedIntent::<NoopRawMutex>::with_intent(Intent::new(RobotState::MovingForward, true));

        let stored = intent.update(|current| Intent {
            state: RobotState::Stationary,
            ..current
        });

        assert_eq!(stored, Intent::new(RobotState::Stationary, true));
        assert_eq!(intent.read(), stored);
    }

    #[test]
    fn only_stationary_is_not_moving() {
        assert!(!RobotState::Stationary.is_moving());
        for state in [
            RobotState::MovingForward,
            RobotState::MovingBackward,
            RobotState::MovingLeft,
            RobotState::MovingRight,
            RobotState::CurvingLeft,
            RobotState::CurvingRight,
        ] {
            assert!(state.is_moving());
        }
    }
}
