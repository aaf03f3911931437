//! Motor dispatcher.
//!
//! The dispatcher sleeps on the motor queue and turns each [`MotorCommand`]
//! into a write of the four motor driver inputs. It keeps no timers of its
//! own: how long the robot moves is decided by when the next command arrives.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;

use crate::command::MotorCommand;
use crate::hal::{GpioOutput, Level, MotorPin};

/// What one side of the drive train does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SideDrive {
    Forward,
    Reverse,
    /// De-energized.
    Off,
}

impl SideDrive {
    /// Levels of the (forward, reverse) inputs.
    fn levels(self) -> (Level, Level) {
        match self {
            SideDrive::Forward => (Level::High, Level::Low),
            SideDrive::Reverse => (Level::Low, Level::High),
            SideDrive::Off => (Level::Low, Level::Low),
        }
    }
}

/// Drive of both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrivePattern {
    pub left: SideDrive,
    pub right: SideDrive,
}

impl From<MotorCommand> for DrivePattern {
    fn from(cmd: MotorCommand) -> Self {
        let (left, right) = match cmd {
            MotorCommand::Forward => (SideDrive::Forward, SideDrive::Forward),
            MotorCommand::Backward => (SideDrive::Reverse, SideDrive::Reverse),
            MotorCommand::Left => (SideDrive::Off, SideDrive::Forward),
            MotorCommand::Right => (SideDrive::Forward, SideDrive::Off),
            MotorCommand::Stop => (SideDrive::Off, SideDrive::Off),
        };
        Self { left, right }
    }
}

/// Applies queued motor commands to the driver inputs.
///
/// # Type Parameters
/// * `'ch` - Lifetime of the motor queue
/// * `M` - Raw mutex guarding the queue
/// * `G` - Motor output implementation
/// * `N` - Queue capacity
pub struct MotorDispatcher<'ch, M: RawMutex, G: GpioOutput<MotorPin>, const N: usize> {
    pins: G,
    commands: Receiver<'ch, M, MotorCommand, N>,
    last: MotorCommand,
}

impl<'ch, M: RawMutex, G: GpioOutput<MotorPin>, const N: usize> MotorDispatcher<'ch, M, G, N> {
    /// Creates a dispatcher and de-energizes both sides.
    pub fn new(pins: G, commands: Receiver<'ch, M, MotorCommand, N>) -> Self {
        let mut dispatcher = Self {
            pins,
            commands,
            last: MotorCommand::Stop,
        };
        dispatcher.apply(MotorCommand::Stop);
        dispatcher
    }

    /// Writes the drive pattern for `cmd`.
    pub fn apply(&mut self, cmd: MotorCommand) {
        let pattern = DrivePattern::from(cmd);
        let (left_fwd, left_rev) = pattern.left.levels();
        let (right_fwd, right_rev) = pattern.right.levels();

        // Release the opposing inputs first so a side never sees both high.
        self.pins.set(MotorPin::LeftReverse, Level::Low);
        self.pins.set(MotorPin::LeftForward, Level::Low);
        self.pins.set(MotorPin::RightReverse, Level::Low);
        self.pins.set(MotorPin::RightForward, Level::Low);

        if left_fwd.is_high() {
            self.pins.set(MotorPin::LeftForward, left_fwd);
        }
        if left_rev.is_high() {
            self.pins.set(MotorPin::LeftReverse, left_rev);
        }
        if right_fwd.is_high() {
            self.pins.set(MotorPin::RightForward, right_fwd);
        }
        if right_rev.is_high() {
            self.pins.set(MotorPin::RightReverse, right_rev);
        }

        self.last = cmd;
    }

    /// Waits for the next command and applies it.
    pub async fn dispatch_next(&mut self) -> MotorCommand {
        let cmd = self.commands.receive().await;

        #[cfg(feature = "defmt")]
        defmt::debug!("motor: {:?}", cmd);

        self.apply(cmd);
        cmd
    }

    /// Dispatches commands forever.
    pub async fn run(&mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!("motor dispatcher started");

        loop {
            self.dispatch_next().await;
        }
    }

    /// Returns the command most recently applied.
    pub fn last_command(&self) -> MotorCommand {
        self.last
    }

    /// Gives back the motor outputs.
    pub fn release(self) -> G {
        self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_stop_the_inner_side() {
        assert_eq!(
            DrivePattern::from(MotorCommand::Left),
            DrivePattern {
                left: SideDrive::Off,
                right: SideDrive::Forward
            }
        );
        assert_eq!(
            DrivePattern::from(MotorCommand::Right),
            DrivePattern {
                left: SideDrive::Forward,
                right: SideDrive::Off
            }
        );
    }

    #[test]
    fn stop_de_energizes_both_sides() {
        let pattern = DrivePattern::from(MotorCommand::Stop);
        assert_eq!(pattern.left.levels(), (Level::Low, Level::Low));
        assert_eq!(pattern.right.levels(), (Level::Low, Level::Low));
    }

    #[test]
    fn backward_reverses_both_sides() {
        let pattern = DrivePattern::from(MotorCommand::Backward);
        assert_eq!(pattern.left.levels(), (Level::Low, Level::High));
        assert_eq!(pattern.right, SideDrive::Reverse);
    }
}
