//! Operator commands and their motor-side counterparts.
//!
//! The operator link sends one ASCII byte per command with no framing,
//! acknowledgment or checksum. Bytes outside the command set are filtered out
//! here and never reach the router.

use crate::state::RobotState;

/// A decoded operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `'F'`
    Forward,
    /// `'B'`
    Backward,
    /// `'L'`: curve left.
    Left,
    /// `'R'`: curve right.
    Right,
    /// `'S'`
    Stop,
    /// `'D'`: the run is finished.
    Done,
}

/// Maps a received byte to a command. Unknown bytes yield `None`.
pub fn decode(byte: u8) -> Option<Command> {
    match byte {
        b'F' => Some(Command::Forward),
        b'B' => Some(Command::Backward),
        b'L' => Some(Command::Left),
        b'R' => Some(Command::Right),
        b'S' => Some(Command::Stop),
        b'D' => Some(Command::Done),
        _ => None,
    }
}

/// Rejected command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand(pub u8);

impl core::fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown command byte 0x{:02x}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownCommand {}

impl TryFrom<u8> for Command {
    type Error = UnknownCommand;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        decode(byte).ok_or(UnknownCommand(byte))
    }
}

impl Command {
    /// The wire byte for this command.
    pub fn as_byte(self) -> u8 {
        match self {
            Command::Forward => b'F',
            Command::Backward => b'B',
            Command::Left => b'L',
            Command::Right => b'R',
            Command::Stop => b'S',
            Command::Done => b'D',
        }
    }

    /// Robot state this command leaves behind.
    pub fn robot_state(self) -> RobotState {
        match self {
            Command::Forward => RobotState::MovingForward,
            Command::Backward => RobotState::MovingBackward,
            Command::Left => RobotState::CurvingLeft,
            Command::Right => RobotState::CurvingRight,
            Command::Stop | Command::Done => RobotState::Stationary,
        }
    }

    /// Motor action queued for this command.
    pub fn motor_command(self) -> MotorCommand {
        match self {
            Command::Forward => MotorCommand::Forward,
            Command::Backward => MotorCommand::Backward,
            Command::Left => MotorCommand::Left,
            Command::Right => MotorCommand::Right,
            Command::Stop | Command::Done => MotorCommand::Stop,
        }
    }

    /// True for the four drive commands, which also clear the completion flag.
    pub fn is_motion(self) -> bool {
        !matches!(self, Command::Stop | Command::Done)
    }
}

/// A drive action for the motor dispatcher.
///
/// Defaults to `Stop`: anything the dispatcher cannot interpret must leave the
/// motors de-energized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    Forward,
    Backward,
    /// Curve left: left side stopped, right side forward.
    Left,
    /// Curve right: right side stopped, left side forward.
    Right,
    #[default]
    Stop,
}
