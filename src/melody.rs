use crate::time::TimeDuration;
use crate::types::{MelodyError, Note};
use heapless::Vec;

/// Default length of each note in the built-in tunes.
pub const DEFAULT_NOTE_MS: u64 = 500;

/// "Mary Had a Little Lamb", looped while the robot is being driven.
///
/// Note frequencies (Hz): C=262, D=294, E=330, G=392.
pub const PRIMARY_THEME_HZ: [u32; 20] = [
    330, 294, 262, 294, 330, 330, 330, //
    294, 294, 294, //
    330, 392, 392, //
    330, 294, 262, 294, 330, 330, 330,
];

/// "Twinkle Twinkle Little Star", played once when the run is done.
pub const COMPLETION_THEME_HZ: [u32; 14] = [
    262, 262, 392, 392, 440, 440, 392, //
    349, 349, 330, 330, 294, 294, 262,
];

/// A fixed-capacity list of notes with their hold durations.
///
/// Whether a melody loops or plays once is decided by the sequencer, not the
/// melody: the primary melody always loops, the completion melody never does.
///
/// # Type Parameters
/// * `D` - The duration type (e.g., `embassy_time::Duration`)
/// * `N` - Maximum number of notes this melody can hold
#[derive(Debug, Clone)]
pub struct Melody<D: TimeDuration, const N: usize> {
    notes: Vec<Note<D>, N>,
}

impl<D: TimeDuration, const N: usize> Melody<D, N> {
    /// Creates a new melody builder.
    pub fn builder() -> MelodyBuilder<D, N> {
        MelodyBuilder::new()
    }

    /// Creates a melody where every entry of `frequencies` is held for
    /// `duration`. Zero frequencies are rests.
    ///
    /// # Errors
    /// Same as [`MelodyBuilder::build`], plus `CapacityExceeded` when
    /// `frequencies` is longer than `N`.
    pub fn uniform(frequencies: &[u32], duration: D) -> Result<Self, MelodyError> {
        let mut builder = MelodyBuilder::new();
        for &hz in frequencies {
            builder = builder.note(hz, duration)?;
        }
        builder.build()
    }

    /// Returns the number of notes in this melody.
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Returns the note at the given index.
    pub fn get_note(&self, index: usize) -> Option<&Note<D>> {
        self.notes.get(index)
    }

    /// Returns all notes in playing order.
    pub fn notes(&self) -> &[Note<D>] {
        &self.notes
    }

    /// Time to play the melody once.
    pub fn total_duration(&self) -> D {
        let total_millis = self.notes.iter().map(|n| n.duration.as_millis()).sum();
        D::from_millis(total_millis)
    }
}

/// The built-in primary tune at [`DEFAULT_NOTE_MS`] per note.
pub fn default_primary<D: TimeDuration, const N: usize>() -> Result<Melody<D, N>, MelodyError> {
    Melody::uniform(&PRIMARY_THEME_HZ, D::from_millis(DEFAULT_NOTE_MS))
}

/// The built-in completion tune at [`DEFAULT_NOTE_MS`] per note.
pub fn default_completion<D: TimeDuration, const N: usize>() -> Result<Melody<D, N>, MelodyError> {
    Melody::uniform(&COMPLETION_THEME_HZ, D::from_millis(DEFAULT_NOTE_MS))
}

/// Builder for constructing validated melodies.
#[derive(Debug)]
pub struct MelodyBuilder<D: TimeDuration, const N: usize> {
    notes: Vec<Note<D>, N>,
}

impl<D: TimeDuration, const N: usize> MelodyBuilder<D, N> {
    /// Creates a new empty melody builder.
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Adds a note. A frequency of zero adds a rest.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the melody is already full.
    pub fn note(mut self, frequency_hz: u32, duration: D) -> Result<Self, MelodyError> {
        self.notes
            .push(Note::tone(frequency_hz, duration))
            .map_err(|_| MelodyError::CapacityExceeded)?;
        Ok(self)
    }

    /// Adds a rest.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the melody is already full.
    pub fn rest(self, duration: D) -> Result<Self, MelodyError> {
        self.note(0, duration)
    }

    /// Builds and validates the melody.
    ///
    /// # Errors
    /// * `EmptyMelody` - No notes were added
    /// * `ZeroDurationNote` - A note or rest has zero duration
    pub fn build(self) -> Result<Melody<D, N>, MelodyError> {
        if self.notes.is_empty() {
            return Err(MelodyError::EmptyMelody);
        }

        if self.notes.iter().any(|n| n.duration.as_millis() == 0) {
            return Err(MelodyError::ZeroDurationNote);
        }

        Ok(Melody { notes: self.notes })
    }
}

impl<D: TimeDuration, const N: usize> Default for MelodyBuilder<D, N> {
    fn default() -> Self {
        Self::new()
    }
}
