//! Core types for melody construction and renderer timing.

use crate::time::TimeDuration;

/// A single note of a melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note<D: TimeDuration> {
    /// Tone frequency. Zero encodes a rest.
    pub frequency_hz: u32,

    /// How long the note (or rest) is held.
    pub duration: D,
}

impl<D: TimeDuration> Note<D> {
    /// Creates a sounding note.
    #[inline]
    pub fn tone(frequency_hz: u32, duration: D) -> Self {
        Self {
            frequency_hz,
            duration,
        }
    }

    /// Creates a rest.
    #[inline]
    pub fn rest(duration: D) -> Self {
        Self {
            frequency_hz: 0,
            duration,
        }
    }

    #[inline]
    pub fn is_rest(&self) -> bool {
        self.frequency_hz == 0
    }
}

/// Melody validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MelodyError {
    /// No notes provided.
    EmptyMelody,

    /// A note with zero duration.
    ZeroDurationNote,

    /// Melody capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for MelodyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MelodyError::EmptyMelody => {
                write!(f, "melody must have at least one note")
            }
            MelodyError::ZeroDurationNote => {
                write!(f, "notes and rests must have a non-zero duration")
            }
            MelodyError::CapacityExceeded => {
                write!(f, "melody capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MelodyError {}

/// Timing information returned by service operations.
///
/// Indicates when the renderer needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Holding the current output. Service again after the specified delay.
    Delay(D),

    /// Nothing left to play. No further servicing is needed.
    Complete,
}
