//! Board commands and the blocking encoder that puts them on the bus.
//!
//! The bus is write-only from the controller's side. Frames are sent and
//! forgotten, no acknowledgment is ever read back.

use std::io::Write;

use log::{debug, warn};
use snafu::{ensure, ResultExt, Snafu};

use crate::codes::{SET_BOARD_CONFIG, SET_PWR_LEVELS};
use crate::frame::{Frame, FrameError};
use crate::types::{Address, CoilProfile, Heartbeat};

/// Highest power level a coil accepts. The lowest is zero, which turns the coil off.
pub const MAX_POWER_LEVEL: u8 = 19;

/// Error type for this module
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum EncodeError {
    /// Neither of the requested coil levels is a valid power level.
    #[snafu(display("Power levels out of range: coil1 {}, coil2 {}", coil1, coil2))]
    OutOfRange { coil1: u8, coil2: u8 },
    /// The bus transport failed while the frame was written.
    #[snafu(display("Transmit fault: {}", source))]
    TransmitFault { source: std::io::Error },
    /// The frame couldn't be laid out.
    #[snafu(display("Invalid frame: {}", source))]
    InvalidFrame { source: FrameError },
}

/// The commands a generator board understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Tell a board which coils are fitted. Sent once at start-up.
    BoardConfig {
        coil1: CoilProfile,
        coil2: CoilProfile,
    },
    /// New power levels for both coils of a board.
    PowerLevels {
        coil1: u8,
        coil2: u8,
        heartbeat: Heartbeat,
    },
}

impl Command {
    /// Power levels that turn both coils of a board off.
    pub const fn zero_power() -> Self {
        Self::PowerLevels {
            coil1: 0,
            coil2: 0,
            heartbeat: Heartbeat::new(0),
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            Self::BoardConfig { .. } => SET_BOARD_CONFIG,
            Self::PowerLevels { .. } => SET_PWR_LEVELS,
        }
    }

    /// Check the command before anything is built.
    ///
    /// A power level command is only rejected when *both* levels are out of
    /// range; a single bad level is passed through to the board.
    /// # Errors
    /// Returns [`EncodeError::OutOfRange`] for a rejected power level command.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if let Self::PowerLevels { coil1, coil2, .. } = *self {
            ensure!(
                coil1 <= MAX_POWER_LEVEL || coil2 <= MAX_POWER_LEVEL,
                OutOfRangeSnafu { coil1, coil2 }
            );
        }
        Ok(())
    }

    /// Validate the command and lay out the frame addressed to `destination`.
    /// # Errors
    /// Returns [`EncodeError::OutOfRange`] if the command doesn't pass [`validate`](Self::validate).
    pub fn frame(&self, destination: Address) -> Result<Frame, EncodeError> {
        self.validate()?;
        let frame = match *self {
            Self::BoardConfig { coil1, coil2 } => {
                Frame::build(destination, self.code(), &[coil1.to_byte(), coil2.to_byte()])
            }
            Self::PowerLevels {
                coil1,
                coil2,
                heartbeat,
            } => Frame::build(destination, self.code(), &[coil1, coil2, heartbeat.value()]),
        };
        frame.context(InvalidFrameSnafu)
    }
}

/// Blocking command encoder writing to a bus transport `IO`.
///
/// Every method takes `&mut self` and writes a whole frame with a single
/// `write_all`, so frames are never interleaved. Share an `Encoder` between
/// threads by putting it behind a `Mutex`.
///
/// # Example
///
/// ```
/// use gea_proto::{Address, CoilProfile, Encoder, Heartbeat};
///
/// let mut encoder = Encoder::new(Vec::new());
/// encoder.configure_board(Address::Board1, CoilProfile::W2500, CoilProfile::W2500)?;
/// encoder.set_power_levels(Address::Board1, 7, 0, Heartbeat::new(1))?;
/// assert_eq!(encoder.get_ref()[0], 0xE2);
/// # Ok::<(), gea_proto::EncodeError>(())
/// ```
#[derive(Debug)]
pub struct Encoder<IO> {
    io: IO,
}

impl<IO> Encoder<IO>
where
    IO: Write,
{
    pub fn new(io: IO) -> Self {
        Self { io }
    }

    /// Send the coil profiles of the board at `address`.
    /// # Errors
    /// Returns [`EncodeError::TransmitFault`] if the transport fails.
    pub fn configure_board(
        &mut self,
        address: Address,
        coil1: CoilProfile,
        coil2: CoilProfile,
    ) -> Result<(), EncodeError> {
        self.send(address, &Command::BoardConfig { coil1, coil2 })
    }

    /// Send new power levels to the board at `address`.
    /// # Errors
    /// Returns [`EncodeError::OutOfRange`] without transmitting anything if both
    /// levels are above [`MAX_POWER_LEVEL`], or [`EncodeError::TransmitFault`]
    /// if the transport fails.
    pub fn set_power_levels(
        &mut self,
        address: Address,
        coil1: u8,
        coil2: u8,
        heartbeat: Heartbeat,
    ) -> Result<(), EncodeError> {
        self.send(
            address,
            &Command::PowerLevels {
                coil1,
                coil2,
                heartbeat,
            },
        )
    }

    /// Encode `command` for `address` and write it to the transport.
    /// # Errors
    /// See [`Command::frame`], and [`EncodeError::TransmitFault`] on transport failure.
    pub fn send(&mut self, address: Address, command: &Command) -> Result<(), EncodeError> {
        let frame = command.frame(address).map_err(|err| {
            warn!("Rejected {:?} for {:?}: {}", command, address, err);
            err
        })?;
        self.transmit(&frame)
    }

    /// Write an already built frame to the transport.
    /// # Errors
    /// Returns [`EncodeError::TransmitFault`] if the transport fails.
    pub fn transmit(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        debug!(
            "TX {:?} cmd {:#04x}: {:02X?}",
            frame.header().destination,
            frame.command(),
            frame.as_bytes()
        );
        self.io.write_all(frame.as_bytes()).context(TransmitFaultSnafu)?;
        self.io.flush().context(TransmitFaultSnafu)
    }

    pub fn get_ref(&self) -> &IO {
        &self.io
    }

    pub fn get_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn into_inner(self) -> IO {
        self.io
    }
}
