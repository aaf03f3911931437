//! Command routing and the serial ingestion loop.
//!
//! Data flow: serial byte → [`decode`] → [`CommandRouter::route`] →
//! {[`SharedIntent`] write, motor queue}. The router is the only writer of the
//! shared intent and the only producer on the motor queue.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Sender};

use crate::command::{Command, MotorCommand, decode};
use crate::hal::SerialReceiver;
use crate::state::{Intent, SharedIntent};

/// Depth of the motor command queue.
pub const MOTOR_QUEUE_DEPTH: usize = 4;

/// Depth of the interrupt-fed serial byte queue.
pub const SERIAL_QUEUE_DEPTH: usize = 16;

/// Bounded queue carrying motor actions from the router to the dispatcher.
pub type MotorQueue<M> = Channel<M, MotorCommand, MOTOR_QUEUE_DEPTH>;

/// Bounded queue carrying received bytes from the UART interrupt.
pub type SerialQueue<M> = Channel<M, u8, SERIAL_QUEUE_DEPTH>;

/// Pushes a received byte without blocking.
///
/// Safe to call from the UART receive interrupt. Returns false when the queue
/// is full and the byte was dropped.
pub fn push_serial_byte<M: RawMutex, const N: usize>(queue: &Channel<M, u8, N>, byte: u8) -> bool {
    queue.try_send(byte).is_ok()
}

/// Errors reported by [`CommandRouter::route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteError {
    /// The motor queue was full; this motor command was dropped. The intent
    /// had already been updated.
    MotorQueueFull(MotorCommand),
}

impl core::fmt::Display for RouteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RouteError::MotorQueueFull(cmd) => {
                write!(f, "motor queue full, dropped {:?}", cmd)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RouteError {}

/// Applies decoded commands to the shared intent and the motor queue.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared intent and the motor queue
/// * `M` - Raw mutex guarding both
/// * `N` - Motor queue capacity
pub struct CommandRouter<'a, M: RawMutex, const N: usize> {
    intent: &'a SharedIntent<M>,
    motor: Sender<'a, M, MotorCommand, N>,
}

impl<'a, M: RawMutex, const N: usize> CommandRouter<'a, M, N> {
    pub fn new(intent: &'a SharedIntent<M>, motor: Sender<'a, M, MotorCommand, N>) -> Self {
        Self { intent, motor }
    }

    /// Routes one command.
    ///
    /// | Command  | state written  | complete  | motor   |
    /// |----------|----------------|-----------|---------|
    /// | Forward  | MovingForward  | false     | Forward |
    /// | Backward | MovingBackward | false     | Backward|
    /// | Left     | CurvingLeft    | false     | Left    |
    /// | Right    | CurvingRight   | false     | Right   |
    /// | Stop     | Stationary     | unchanged | Stop    |
    /// | Done     | Stationary     | true      | Stop    |
    ///
    /// Exactly one motor command is offered to the queue per call. The enqueue
    /// never blocks: when the queue is full the newest command is dropped and
    /// reported, and is not retried.
    pub fn route(&self, cmd: Command) -> Result<(), RouteError> {
        let state = cmd.robot_state();
        let _stored = self.intent.update(|current| {
            let complete = if cmd.is_motion() {
                false
            } else {
                cmd == Command::Done || current.complete
            };
            Intent::new(state, complete)
        });

        #[cfg(feature = "defmt")]
        defmt::debug!("routed {:?}: intent now {:?}", cmd, _stored);

        let motor_cmd = cmd.motor_command();
        self.motor
            .try_send(motor_cmd)
            .map_err(|_| RouteError::MotorQueueFull(motor_cmd))
    }

    /// Decodes and routes one raw byte. Unknown bytes are ignored.
    ///
    /// Returns the decoded command, or `None` for a filtered byte.
    pub fn route_byte(&self, byte: u8) -> Result<Option<Command>, RouteError> {
        match decode(byte) {
            Some(cmd) => self.route(cmd).map(|()| Some(cmd)),
            None => Ok(None),
        }
    }
}

/// Pulls bytes off a serial receiver and feeds them to a router.
pub struct CommandIngest<'a, M: RawMutex, S: SerialReceiver, const N: usize> {
    serial: S,
    router: CommandRouter<'a, M, N>,
}

impl<'a, M: RawMutex, S: SerialReceiver, const N: usize> CommandIngest<'a, M, S, N> {
    pub fn new(serial: S, router: CommandRouter<'a, M, N>) -> Self {
        Self { serial, router }
    }

    /// Waits for one byte and routes it.
    ///
    /// A full motor queue is not an error at this level: the drop is logged and
    /// the decoded command is still returned, since the intent was updated.
    pub async fn ingest_next(&mut self) -> Option<Command> {
        let byte = self.serial.receive_byte().await;
        match self.router.route_byte(byte) {
            Ok(cmd) => cmd,
            Err(RouteError::MotorQueueFull(_dropped)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("motor queue full, dropped {:?}", _dropped);
                decode(byte)
            }
        }
    }

    /// Routes bytes forever.
    pub async fn run(&mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!("command ingest started");

        loop {
            self.ingest_next().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RobotState;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    macro_rules! setup {
        ($intent:ident, $queue:ident, $router:ident) => {
            let $intent = SharedIntent::<NoopRawMutex>::new();
            let $queue = Channel::<NoopRawMutex, MotorCommand, 2>::new();
            let $router = CommandRouter::new(&$intent, $queue.sender());
        };
    }

    #[test]
    fn stop_leaves_completion_flag_alone() {
        setup!(intent, queue, router);

        router.route(Command::Done).unwrap();
        router.route(Command::Stop).unwrap();

        assert_eq!(intent.read(), Intent::new(RobotState::Stationary, true));
        assert_eq!(queue.try_receive().ok(), Some(MotorCommand::Stop));
        assert_eq!(queue.try_receive().ok(), Some(MotorCommand::Stop));
    }

    #[test]
    fn full_queue_drops_newest_but_still_updates_intent() {
        setup!(intent, queue, router);

        router.route(Command::Forward).unwrap();
        router.route(Command::Left).unwrap();
        let result = router.route(Command::Right);

        assert_eq!(result, Err(RouteError::MotorQueueFull(MotorCommand::Right)));
        assert_eq!(intent.read().state, RobotState::CurvingRight);
        assert_eq!(queue.try_receive().ok(), Some(MotorCommand::Forward));
        assert_eq!(queue.try_receive().ok(), Some(MotorCommand::Left));
        assert!(queue.try_receive().is_err());
    }

    #[test]
    fn route_byte_filters_unknown_bytes() {
        setup!(intent, queue, router);
        intent.write(RobotState::MovingBackward, true);

        assert_eq!(router.route_byte(b'x'), Ok(None));
        assert_eq!(router.route_byte(b'\n'), Ok(None));

        assert_eq!(intent.read(), Intent::new(RobotState::MovingBackward, true));
        assert!(queue.try_receive().is_err());
    }

    #[test]
    fn push_serial_byte_reports_drop_when_full() {
        let queue = Channel::<NoopRawMutex, u8, 1>::new();
        assert!(push_serial_byte(&queue, b'F'));
        assert!(!push_serial_byte(&queue, b'S'));
        assert_eq!(queue.try_receive().ok(), Some(b'F'));
    }
}
