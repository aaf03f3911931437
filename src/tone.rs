//! Tone register arithmetic for timer-driven buzzers.
//!
//! A buzzer fed by an edge-aligned PWM timer is tuned by its modulo (period)
//! register; the channel compare value sets the duty cycle. [`TonePwm`] turns
//! the frequency requests of [`PwmChannel`] into those two register values so
//! board code only has to implement the raw writes in [`ToneTimer`].

use crate::hal::PwmChannel;

/// Clock feeding the tone timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneClock {
    /// Timer input clock.
    pub timer_clock_hz: u32,
    /// Prescaler division applied to `timer_clock_hz`.
    pub prescaler_divisor: u32,
}

impl Default for ToneClock {
    /// 48 MHz timer clock, prescaler 128.
    fn default() -> Self {
        Self {
            timer_clock_hz: 48_000_000,
            prescaler_divisor: 128,
        }
    }
}

/// Register values for one tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneRegisters {
    /// Period register value.
    pub modulo: u32,
    /// Compare value for a 50% duty cycle.
    pub duty: u32,
}

impl ToneClock {
    /// Computes register values for `frequency_hz`.
    ///
    /// `modulo = ceil(clock / (divisor * hz))`, `duty = modulo / 2` (rounded
    /// down, so the high phase may be one tick short). Returns `None` for
    /// 0 Hz, which is a rest.
    pub fn registers(&self, frequency_hz: u32) -> Option<ToneRegisters> {
        if frequency_hz == 0 {
            return None;
        }

        let denominator = u64::from(self.prescaler_divisor.max(1)) * u64::from(frequency_hz);
        let modulo = u64::from(self.timer_clock_hz).div_ceil(denominator);
        let modulo = u32::try_from(modulo).unwrap_or(u32::MAX);

        Some(ToneRegisters {
            modulo,
            duty: modulo / 2,
        })
    }
}

/// Raw access to a tone timer channel.
pub trait ToneTimer {
    /// Loads the period and compare registers and enables the output.
    fn write(&mut self, registers: ToneRegisters);

    /// Disconnects the output.
    fn disable(&mut self);
}

/// [`PwmChannel`] built on a [`ToneTimer`].
pub struct TonePwm<R: ToneTimer> {
    timer: R,
    clock: ToneClock,
    current: Option<ToneRegisters>,
}

impl<R: ToneTimer> TonePwm<R> {
    pub fn new(timer: R, clock: ToneClock) -> Self {
        Self {
            timer,
            clock,
            current: None,
        }
    }

    /// Register values currently loaded, `None` while silent.
    pub fn current(&self) -> Option<ToneRegisters> {
        self.current
    }

    pub fn release(self) -> R {
        self.timer
    }
}

impl<R: ToneTimer> PwmChannel for TonePwm<R> {
    fn set_frequency(&mut self, hz: u32) {
        match self.clock.registers(hz) {
            Some(registers) => {
                // Skip the write when retriggering the same note.
                if self.current != Some(registers) {
                    self.timer.write(registers);
                    self.current = Some(registers);
                }
            }
            None => self.silence(),
        }
    }

    fn silence(&mut self) {
        self.timer.disable();
        self.current = None;
    }
}
