//! Hardware capability traits.
//!
//! Register-level setup (clock gating, pin muxing, timer configuration) lives
//! outside this crate. Board code hands the renderers objects implementing
//! these traits, already initialized; a failed peripheral init is expected to
//! stop the firmware before any of them are constructed.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;

/// Number of LEDs in each of the green and red banks.
pub const LED_COUNT: usize = 8;

/// Logical output level.
///
/// `High` means "active" (LED lit, motor input driven). Boards with
/// active-low wiring invert inside their [`GpioOutput`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(active: bool) -> Self {
        if active { Level::High } else { Level::Low }
    }
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// One of the 16 status LED channels.
///
/// The index is the position within the bank, `0..LED_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedChannel {
    Green(u8),
    Red(u8),
}

/// Motor driver inputs, one forward and one reverse line per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorPin {
    LeftForward,
    LeftReverse,
    RightForward,
    RightReverse,
}

/// Trait for abstracting digital outputs.
///
/// Implement this for your GPIO ports. Writes cannot fail; handle any hardware
/// error internally.
pub trait GpioOutput<P> {
    /// Drives `pin` to `level`.
    fn set(&mut self, pin: P, level: Level);
}

/// Trait for abstracting the buzzer's PWM tone output.
pub trait PwmChannel {
    /// Starts (or retunes) a square wave at `hz`.
    fn set_frequency(&mut self, hz: u32);

    /// Stops any tone.
    fn silence(&mut self);
}

/// Byte-at-a-time serial input.
///
/// `receive_byte` suspends the calling task until a byte is available.
#[allow(async_fn_in_trait)]
pub trait SerialReceiver {
    async fn receive_byte(&mut self) -> u8;
}

/// An interrupt-fed byte queue is a serial receiver as is.
impl<M: RawMutex, const N: usize> SerialReceiver for Receiver<'_, M, u8, N> {
    async fn receive_byte(&mut self) -> u8 {
        self.receive().await
    }
}
