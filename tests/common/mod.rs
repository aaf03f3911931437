//! Shared test infrastructure for robot-intent integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::RefCell;
use std::rc::Rc;

use robot_intent::{
    GpioOutput, LED_COUNT, LedChannel, Level, MillisInstant, MotorPin, PwmChannel, TimeSource,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<MillisInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(MillisInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time
            .set(MillisInstant(current.0.wrapping_add(millis)));
    }

    pub fn set_time(&self, time: MillisInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<MillisInstant> for MockTimeSource {
    fn now(&self) -> MillisInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock LED banks
// ============================================================================

/// Level of every LED channel plus a count of red bank toggles
#[derive(Debug, Default)]
pub struct LedBanks {
    pub green: [bool; LED_COUNT],
    pub red: [bool; LED_COUNT],
    pub red_toggles: u32,
}

/// Mock LED outputs. Clones share state, so a test keeps a handle while the
/// renderer owns the other.
#[derive(Debug, Default, Clone)]
pub struct MockLeds(Rc<RefCell<LedBanks>>);

impl MockLeds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices of the lit green LEDs
    pub fn lit_green(&self) -> Vec<usize> {
        let banks = self.0.borrow();
        (0..LED_COUNT).filter(|&i| banks.green[i]).collect()
    }

    pub fn all_green_on(&self) -> bool {
        self.0.borrow().green.iter().all(|&on| on)
    }

    pub fn all_green_off(&self) -> bool {
        self.0.borrow().green.iter().all(|&on| !on)
    }

    /// True when all eight red LEDs are at `on`
    pub fn all_red(&self, on: bool) -> bool {
        self.0.borrow().red.iter().all(|&lit| lit == on)
    }

    pub fn red_toggles(&self) -> u32 {
        self.0.borrow().red_toggles
    }

    pub fn reset_red_toggles(&self) {
        self.0.borrow_mut().red_toggles = 0;
    }
}

impl GpioOutput<LedChannel> for MockLeds {
    fn set(&mut self, pin: LedChannel, level: Level) {
        let mut banks = self.0.borrow_mut();
        match pin {
            LedChannel::Green(i) => banks.green[i as usize] = level.is_high(),
            LedChannel::Red(i) => {
                let lit = level.is_high();
                // The bank toggles in lock-step; count on channel 0 only.
                if i == 0 && banks.red[0] != lit {
                    banks.red_toggles += 1;
                }
                banks.red[i as usize] = lit;
            }
        }
    }
}

// ============================================================================
// Mock motor driver
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MotorLines {
    pub left_forward: bool,
    pub left_reverse: bool,
    pub right_forward: bool,
    pub right_reverse: bool,
}

#[derive(Debug, Default)]
struct MotorState {
    lines: MotorLines,
    shoot_through: bool,
}

/// Records motor input levels and flags any moment a side had both inputs high
#[derive(Debug, Default, Clone)]
pub struct MockMotorPins(Rc<RefCell<MotorState>>);

impl MockMotorPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> MotorLines {
        self.0.borrow().lines
    }

    pub fn shoot_through(&self) -> bool {
        self.0.borrow().shoot_through
    }
}

impl GpioOutput<MotorPin> for MockMotorPins {
    fn set(&mut self, pin: MotorPin, level: Level) {
        let mut state = self.0.borrow_mut();
        let high = level.is_high();
        match pin {
            MotorPin::LeftForward => state.lines.left_forward = high,
            MotorPin::LeftReverse => state.lines.left_reverse = high,
            MotorPin::RightForward => state.lines.right_forward = high,
            MotorPin::RightReverse => state.lines.right_reverse = high,
        }
        let lines = state.lines;
        if (lines.left_forward && lines.left_reverse) || (lines.right_forward && lines.right_reverse) {
            state.shoot_through = true;
        }
    }
}

// ============================================================================
// Mock buzzer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerEvent {
    Tone(u32),
    Silence,
}

/// Buzzer that records every request. Clones share the record.
#[derive(Debug, Default, Clone)]
pub struct MockBuzzer(Rc<RefCell<Vec<BuzzerEvent>>>);

impl MockBuzzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frequency currently sounding
    pub fn tone(&self) -> Option<u32> {
        match self.0.borrow().last() {
            Some(BuzzerEvent::Tone(hz)) => Some(*hz),
            _ => None,
        }
    }

    /// Frequencies played, in order, ignoring silences
    pub fn tones(&self) -> Vec<u32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                BuzzerEvent::Tone(hz) => Some(*hz),
                BuzzerEvent::Silence => None,
            })
            .collect()
    }

    pub fn history(&self) -> Vec<BuzzerEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl PwmChannel for MockBuzzer {
    fn set_frequency(&mut self, hz: u32) {
        self.0.borrow_mut().push(BuzzerEvent::Tone(hz));
    }

    fn silence(&mut self) {
        self.0.borrow_mut().push(BuzzerEvent::Silence);
    }
}
