//! Start-up sequence for the generator boards.
//!
//! Each board first learns its coil profiles and then gets a zero power
//! command. The steps for each topology are a static table, see
//! [`Personality::init_sequence`].

use std::io::Write;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::{ControllerConfig, Personality};
use crate::encoder::{Command, EncodeError, Encoder};
use crate::types::{Address, CoilProfile};

/// Fixed wait between bus frames.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the calling thread for the requested duration.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// One step of the start-up sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitStep {
    Configure {
        board: Address,
        coil1: CoilProfile,
        coil2: CoilProfile,
    },
    ZeroPower {
        board: Address,
    },
}

impl InitStep {
    pub const fn board(&self) -> Address {
        match *self {
            Self::Configure { board, .. } | Self::ZeroPower { board } => board,
        }
    }

    pub const fn command(&self) -> Command {
        match *self {
            Self::Configure { coil1, coil2, .. } => Command::BoardConfig { coil1, coil2 },
            Self::ZeroPower { .. } => Command::zero_power(),
        }
    }
}

const fn configure(board: Address, coil1: CoilProfile, coil2: CoilProfile) -> InitStep {
    InitStep::Configure {
        board,
        coil1,
        coil2,
    }
}

const fn zero(board: Address) -> InitStep {
    InitStep::ZeroPower { board }
}

const FOUR_COIL: [InitStep; 4] = [
    configure(Address::Board1, CoilProfile::W2500, CoilProfile::W2500),
    configure(Address::Board2, CoilProfile::W3700, CoilProfile::W1800),
    zero(Address::Board1),
    zero(Address::Board2),
];

const FIVE_COIL: [InitStep; 6] = [
    configure(Address::Board1, CoilProfile::W2500, CoilProfile::W2500),
    configure(Address::Board2, CoilProfile::W3700, CoilProfile::None),
    configure(Address::Board3, CoilProfile::W1800, CoilProfile::W3200),
    zero(Address::Board1),
    zero(Address::Board2),
    zero(Address::Board3),
];

impl Personality {
    /// The start-up steps for this topology, in transmit order.
    pub fn init_sequence(self) -> &'static [InitStep] {
        match self {
            Self::FourCoil => &FOUR_COIL,
            Self::FiveCoil => &FIVE_COIL,
        }
    }

    /// Generator boards present in this topology.
    pub fn boards(self) -> &'static [Address] {
        match self {
            Self::FourCoil => &[Address::Board1, Address::Board2],
            Self::FiveCoil => &[Address::Board1, Address::Board2, Address::Board3],
        }
    }
}

/// Outcome of [`initialize`].
#[derive(Debug, Default)]
pub struct InitReport {
    /// Steps whose frame was written to the bus.
    pub sent: usize,
    /// Steps that failed, with the error. The sequence carried on after each.
    pub failed: Vec<(InitStep, EncodeError)>,
}

impl InitReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run the start-up sequence for the configured personality.
///
/// Steps run in order with `config.frame_spacing` after each one. A failed
/// step is logged and recorded, never retried, and doesn't stop the sequence.
pub fn initialize<IO, P>(
    encoder: &mut Encoder<IO>,
    config: &ControllerConfig,
    pause: &mut P,
) -> InitReport
where
    IO: Write,
    P: Pause,
{
    let steps = config.personality.init_sequence();
    info!(
        "Initializing {:?} topology, {} steps",
        config.personality,
        steps.len()
    );

    let mut report = InitReport::default();
    for step in steps {
        debug!("Init step {:?}", step);
        match encoder.send(step.board(), &step.command()) {
            Ok(()) => report.sent += 1,
            Err(err) => {
                warn!("Init step {:?} failed: {}", step, err);
                report.failed.push((*step, err));
            }
        }
        pause.pause(config.frame_spacing);
    }

    info!(
        "Initialization done, {} sent, {} failed",
        report.sent,
        report.failed.len()
    );
    report
}
