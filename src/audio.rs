//! Buzzer melody sequencer with completion handling.
//!
//! Provides [`AudioSequencer`], which loops a primary melody while the run is
//! in progress and switches, one way, to a completion melody once the shared
//! intent reports the run as done. The completion melody plays once and the
//! buzzer then stays silent.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::hal::PwmChannel;
use crate::melody::{Melody, default_completion, default_primary};
use crate::state::SharedIntent;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{MelodyError, Note, ServiceTiming};

/// The current state of an audio sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioState {
    /// Looping the primary melody.
    PlayingPrimary,
    /// Playing the completion melody, once.
    PlayingCompletion,
    /// Completion melody finished. Buzzer silent for good.
    Finished,
}

/// Sequencer-local playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AudioCursor {
    /// Index into the active melody.
    pub note_index: usize,
    /// Set once the switch to the completion melody has happened.
    pub completion_triggered: bool,
}

/// Plays melodies on a PWM buzzer, one note per service call.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared intent
/// * `'t` - Lifetime of the time source reference
/// * `M` - Raw mutex guarding the intent
/// * `I` - Time instant type
/// * `P` - Buzzer implementation
/// * `T` - Time source implementation
/// * `N` - Maximum number of notes per melody
pub struct AudioSequencer<'a, 't, M, I, P, T, const N: usize>
where
    M: RawMutex,
    I: TimeInstant,
    P: PwmChannel,
    T: TimeSource<I>,
{
    pwm: P,
    intent: &'a SharedIntent<M>,
    time_source: &'t T,
    primary: Melody<I::Duration, N>,
    completion: Melody<I::Duration, N>,
    state: AudioState,
    cursor: AudioCursor,
    note_started: Option<I>,
}

impl<'a, 't, M, I, P, T, const N: usize> AudioSequencer<'a, 't, M, I, P, T, N>
where
    M: RawMutex,
    I: TimeInstant,
    P: PwmChannel,
    T: TimeSource<I>,
{
    /// Creates a sequencer positioned at the start of the primary melody,
    /// with the buzzer silenced.
    pub fn new(
        mut pwm: P,
        intent: &'a SharedIntent<M>,
        time_source: &'t T,
        primary: Melody<I::Duration, N>,
        completion: Melody<I::Duration, N>,
    ) -> Self {
        pwm.silence();

        Self {
            pwm,
            intent,
            time_source,
            primary,
            completion,
            state: AudioState::PlayingPrimary,
            cursor: AudioCursor::default(),
            note_started: None,
        }
    }

    /// Creates a sequencer with the built-in tunes.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if `N` cannot hold the built-in tunes.
    pub fn with_default_melodies(
        pwm: P,
        intent: &'a SharedIntent<M>,
        time_source: &'t T,
    ) -> Result<Self, MelodyError> {
        Ok(Self::new(
            pwm,
            intent,
            time_source,
            default_primary()?,
            default_completion()?,
        ))
    }

    /// Runs one tick.
    ///
    /// While on the primary melody the completion flag is checked first, so
    /// the switch happens on the first tick after the flag is raised, even in
    /// the middle of a note. Otherwise the current note keeps sounding until
    /// its duration has elapsed, then the next one starts.
    ///
    /// # Returns
    /// - `ServiceTiming::Delay(d)` - Service again after `d`
    /// - `ServiceTiming::Complete` - Completion melody done; buzzer silent
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        if self.state == AudioState::PlayingPrimary && self.intent.read().complete {
            #[cfg(feature = "defmt")]
            defmt::info!("audio: run complete, switching to completion melody");

            self.state = AudioState::PlayingCompletion;
            self.cursor = AudioCursor {
                note_index: 0,
                completion_triggered: true,
            };
            self.note_started = None;
        }

        if self.state == AudioState::Finished {
            return ServiceTiming::Complete;
        }

        let now = self.time_source.now();

        if let Some(started) = self.note_started {
            let hold = self.current_duration();
            let elapsed = now.duration_since(started);
            if elapsed.as_millis() < hold.as_millis() {
                return ServiceTiming::Delay(hold.saturating_sub(elapsed));
            }

            if !self.advance() {
                self.pwm.silence();
                self.note_started = None;
                self.state = AudioState::Finished;

                #[cfg(feature = "defmt")]
                defmt::info!("audio: completion melody finished");

                return ServiceTiming::Complete;
            }
        }

        let note = *self.current_note();
        if note.is_rest() {
            self.pwm.silence();
        } else {
            self.pwm.set_frequency(note.frequency_hz);
        }
        self.note_started = Some(now);

        ServiceTiming::Delay(note.duration)
    }

    /// Moves to the next note. Returns false when the completion melody has
    /// run out.
    fn advance(&mut self) -> bool {
        let next = self.cursor.note_index + 1;
        match self.state {
            AudioState::PlayingPrimary => {
                self.cursor.note_index = next % self.primary.note_count();
                true
            }
            AudioState::PlayingCompletion if next < self.completion.note_count() => {
                self.cursor.note_index = next;
                true
            }
            _ => false,
        }
    }

    fn active_melody(&self) -> &Melody<I::Duration, N> {
        match self.state {
            AudioState::PlayingPrimary => &self.primary,
            AudioState::PlayingCompletion | AudioState::Finished => &self.completion,
        }
    }

    fn current_note(&self) -> &Note<I::Duration> {
        // Melodies are non-empty and the cursor never leaves the active melody.
        &self.active_melody().notes()[self.cursor.note_index]
    }

    fn current_duration(&self) -> I::Duration {
        self.current_note().duration
    }

    /// Returns the current state of the sequencer.
    pub fn state(&self) -> AudioState {
        self.state
    }

    /// Returns the playback cursor.
    pub fn cursor(&self) -> AudioCursor {
        self.cursor
    }

    /// Returns the note currently sounding, if any.
    pub fn playing(&self) -> Option<&Note<I::Duration>> {
        self.note_started.map(|_| self.current_note())
    }

    /// Gives back the buzzer.
    pub fn release(self) -> P {
        self.pwm
    }
}
