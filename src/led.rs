//! Status LED renderer.
//!
//! Provides [`LedRenderer`], a tick-driven state machine that mirrors the
//! robot's intent on two banks of eight LEDs:
//!
//! - **Green**: while moving, a single lit LED runs around the bank, one step
//!   per `green_interval`. While stationary the whole bank is lit solid.
//! - **Red**: the whole bank toggles in lock-step, every `red_interval_moving`
//!   while moving and every `red_interval_stationary` (twice as fast by
//!   default) while stationary.
//!
//! The two timers are independent. A change of robot state resets both and
//! draws the new pattern's first frame in the same tick, so the display never
//! lags a state change by a full interval.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::hal::{GpioOutput, LED_COUNT, LedChannel, Level};
use crate::state::{RobotState, SharedIntent};
use crate::time::{TimeDuration, TimeInstant, TimeSource, min_duration};

/// Timing of the LED patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedConfig<D: TimeDuration> {
    /// Time between running-light steps while moving.
    pub green_interval: D,
    /// Time between red toggles while moving.
    pub red_interval_moving: D,
    /// Time between red toggles while stationary.
    pub red_interval_stationary: D,
}

impl<D: TimeDuration> Default for LedConfig<D> {
    fn default() -> Self {
        Self {
            green_interval: D::from_millis(100),
            red_interval_moving: D::from_millis(500),
            red_interval_stationary: D::from_millis(250),
        }
    }
}

impl<D: TimeDuration> LedConfig<D> {
    pub fn with_green_interval(mut self, interval: D) -> Self {
        self.green_interval = interval;
        self
    }

    pub fn with_red_interval_moving(mut self, interval: D) -> Self {
        self.red_interval_moving = interval;
        self
    }

    pub fn with_red_interval_stationary(mut self, interval: D) -> Self {
        self.red_interval_stationary = interval;
        self
    }

    /// Red toggle interval for `state`.
    pub fn red_interval(&self, state: RobotState) -> D {
        if state.is_moving() {
            self.red_interval_moving
        } else {
            self.red_interval_stationary
        }
    }
}

/// Which pattern the renderer is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPattern {
    /// Nothing drawn yet for the current state. All LEDs off.
    Idle,
    /// Running green light, slow red blink.
    RunningAnimation,
    /// Solid green, fast red blink.
    SolidOn,
}

impl LedPattern {
    fn for_state(state: RobotState) -> Self {
        if state.is_moving() {
            LedPattern::RunningAnimation
        } else {
            LedPattern::SolidOn
        }
    }
}

/// Renderer-local animation position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPatternCursor<I> {
    /// Lit LED of the running light, `0..LED_COUNT`.
    pub current_index: u8,
    /// When the running light last stepped.
    pub last_green_tick: Option<I>,
    /// When the red bank last toggled.
    pub last_red_tick: Option<I>,
    /// Robot state seen on the previous tick.
    pub previous_observed_state: Option<RobotState>,
}

impl<I> LedPatternCursor<I> {
    const fn new() -> Self {
        Self {
            current_index: 0,
            last_green_tick: None,
            last_red_tick: None,
            previous_observed_state: None,
        }
    }
}

/// Drives the 16 status LEDs from the shared intent.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared intent
/// * `'t` - Lifetime of the time source reference
/// * `M` - Raw mutex guarding the intent
/// * `I` - Time instant type
/// * `G` - LED output implementation
/// * `T` - Time source implementation
pub struct LedRenderer<'a, 't, M, I, G, T>
where
    M: RawMutex,
    I: TimeInstant,
    G: GpioOutput<LedChannel>,
    T: TimeSource<I>,
{
    leds: G,
    intent: &'a SharedIntent<M>,
    time_source: &'t T,
    config: LedConfig<I::Duration>,
    pattern: LedPattern,
    cursor: LedPatternCursor<I>,
    red_on: bool,
}

impl<'a, 't, M, I, G, T> LedRenderer<'a, 't, M, I, G, T>
where
    M: RawMutex,
    I: TimeInstant,
    G: GpioOutput<LedChannel>,
    T: TimeSource<I>,
{
    /// Creates an idle renderer with every LED turned off.
    pub fn new(
        mut leds: G,
        intent: &'a SharedIntent<M>,
        time_source: &'t T,
        config: LedConfig<I::Duration>,
    ) -> Self {
        for i in 0..LED_COUNT as u8 {
            leds.set(LedChannel::Green(i), Level::Low);
            leds.set(LedChannel::Red(i), Level::Low);
        }

        Self {
            leds,
            intent,
            time_source,
            config,
            pattern: LedPattern::Idle,
            cursor: LedPatternCursor::new(),
            red_on: false,
        }
    }

    /// Runs one tick.
    ///
    /// Reads the intent once, redraws whatever is due and returns the time
    /// until the next timer boundary. Calling early is harmless; the renderer
    /// only acts on boundaries that have actually passed.
    pub fn service(&mut self) -> I::Duration {
        let state = self.intent.read().state;
        let now = self.time_source.now();

        if self.cursor.previous_observed_state != Some(state) {
            self.enter(state, now);
        } else {
            self.advance(state, now);
        }

        self.next_deadline(state, now)
    }

    /// Resets the cursor for `state` and draws its first frame.
    fn enter(&mut self, state: RobotState, now: I) {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "led: {:?} -> {:?}",
            self.cursor.previous_observed_state,
            state
        );

        self.pattern = LedPattern::for_state(state);
        self.cursor = LedPatternCursor {
            current_index: 0,
            last_green_tick: Some(now),
            last_red_tick: Some(now),
            previous_observed_state: Some(state),
        };

        self.draw_green();
        self.red_on = true;
        self.draw_red();
    }

    fn advance(&mut self, state: RobotState, now: I) {
        if self.pattern == LedPattern::RunningAnimation
            && Self::is_due(self.cursor.last_green_tick, self.config.green_interval, now)
        {
            self.cursor.current_index = (self.cursor.current_index + 1) % LED_COUNT as u8;
            self.cursor.last_green_tick = Some(now);
            self.draw_green();
        }

        if Self::is_due(self.cursor.last_red_tick, self.config.red_interval(state), now) {
            self.red_on = !self.red_on;
            self.cursor.last_red_tick = Some(now);
            self.draw_red();
        }
    }

    fn is_due(last: Option<I>, interval: I::Duration, now: I) -> bool {
        match last {
            Some(last) => now.duration_since(last).as_millis() >= interval.as_millis(),
            None => true,
        }
    }

    fn remaining(last: Option<I>, interval: I::Duration, now: I) -> I::Duration {
        match last {
            Some(last) => interval.saturating_sub(now.duration_since(last)),
            None => I::Duration::ZERO,
        }
    }

    fn next_deadline(&self, state: RobotState, now: I) -> I::Duration {
        let red = Self::remaining(self.cursor.last_red_tick, self.config.red_interval(state), now);
        if self.pattern == LedPattern::RunningAnimation {
            let green = Self::remaining(self.cursor.last_green_tick, self.config.green_interval, now);
            min_duration(red, green)
        } else {
            red
        }
    }

    fn draw_green(&mut self) {
        for i in 0..LED_COUNT as u8 {
            let lit = match self.pattern {
                LedPattern::RunningAnimation => i == self.cursor.current_index,
                LedPattern::SolidOn => true,
                LedPattern::Idle => false,
            };
            self.leds.set(LedChannel::Green(i), Level::from(lit));
        }
    }

    fn draw_red(&mut self) {
        let level = Level::from(self.red_on);
        for i in 0..LED_COUNT as u8 {
            self.leds.set(LedChannel::Red(i), level);
        }
    }

    /// Returns the pattern currently drawn.
    pub fn pattern(&self) -> LedPattern {
        self.pattern
    }

    /// Returns the animation cursor.
    pub fn cursor(&self) -> &LedPatternCursor<I> {
        &self.cursor
    }

    /// Returns true while the red bank is lit.
    pub fn red_on(&self) -> bool {
        self.red_on
    }

    pub fn config(&self) -> &LedConfig<I::Duration> {
        &self.config
    }

    /// Gives back the LED outputs.
    pub fn release(self) -> G {
        self.leds
    }
}
