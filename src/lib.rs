#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`SharedIntent`**: Lock-guarded `RobotState` + completion flag, the single source of truth
//! - **`decode`**: Maps one received byte to a `Command`; unknown bytes are dropped
//! - **`CommandRouter`**: Applies a `Command` to the intent and queues one `MotorCommand`
//! - **`CommandIngest`**: Feeds bytes from a `SerialReceiver` through the router
//! - **`LedRenderer`**: Tick-driven running-light / blink patterns on 8 green + 8 red LEDs
//! - **`MotorDispatcher`**: Waits on the motor queue and drives the motor inputs
//! - **`AudioSequencer`**: Loops a melody until the run completes, then plays a completion melody once
//! - **`GpioOutput`**, **`PwmChannel`**, **`SerialReceiver`**: Traits to implement for your hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Renderers never sleep themselves. Each `service()` call does whatever is
//! due and reports how long the caller may sleep before the next call.

pub mod time;
pub mod hal;
pub mod state;
pub mod command;
pub mod router;
pub mod led;
pub mod motor;
pub mod types;
pub mod melody;
pub mod audio;
pub mod tone;

pub use state::{Intent, RobotState, SharedIntent};
pub use command::{Command, MotorCommand, UnknownCommand, decode};
pub use router::{
    CommandIngest, CommandRouter, MOTOR_QUEUE_DEPTH, MotorQueue, RouteError, SERIAL_QUEUE_DEPTH,
    SerialQueue, push_serial_byte,
};
pub use hal::{GpioOutput, LED_COUNT, LedChannel, Level, MotorPin, PwmChannel, SerialReceiver};
pub use led::{LedConfig, LedPattern, LedPatternCursor, LedRenderer};
pub use motor::{DrivePattern, MotorDispatcher, SideDrive};
pub use types::{MelodyError, Note, ServiceTiming};
pub use melody::{Melody, MelodyBuilder};
pub use audio::{AudioCursor, AudioSequencer, AudioState};
pub use tone::{ToneClock, TonePwm, ToneRegisters, ToneTimer};
pub use time::{Millis, MillisInstant, TimeDuration, TimeInstant, TimeSource};

/// Audio sequencer sized for the built-in tunes.
pub type DefaultAudioSequencer<'a, 't, M, I, P, T> = AudioSequencer<'a, 't, M, I, P, T, 20>;
