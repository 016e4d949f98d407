//! Periodic control loop feeding operator input to the generator boards.

use std::io::Write;

use log::{debug, warn};

use crate::config::{ControllerConfig, Personality};
use crate::encoder::{EncodeError, Encoder, MAX_POWER_LEVEL};
use crate::sequencer::Pause;
use crate::types::{Address, Heartbeat};

/// Source of requested power levels, one per physical coil.
pub trait LevelSource {
    /// Requested level for coil `coil`, counted from zero.
    fn sample(&mut self, coil: usize) -> u8;
}

impl<F> LevelSource for F
where
    F: FnMut(usize) -> u8,
{
    fn sample(&mut self, coil: usize) -> u8 {
        self(coil)
    }
}

/// Map a raw analog reading in `0..=raw_max` onto a power level.
pub fn scale_reading(raw: u16, raw_max: u16) -> u8 {
    if raw_max == 0 {
        return 0;
    }
    let raw = u32::from(raw.min(raw_max));
    (raw * u32::from(MAX_POWER_LEVEL) / u32::from(raw_max)) as u8
}

/// Where a board's two coil slots take their level from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoardSlots {
    pub board: Address,
    /// Coil index for each slot, `None` where no coil is fitted.
    pub coils: [Option<usize>; 2],
}

const FOUR_COIL_SLOTS: [BoardSlots; 2] = [
    BoardSlots {
        board: Address::Board1,
        coils: [Some(0), Some(1)],
    },
    BoardSlots {
        board: Address::Board2,
        coils: [Some(2), Some(3)],
    },
];

// Board 2 drives a single coil in the five coil topology.
const FIVE_COIL_SLOTS: [BoardSlots; 3] = [
    BoardSlots {
        board: Address::Board1,
        coils: [Some(0), Some(1)],
    },
    BoardSlots {
        board: Address::Board2,
        coils: [Some(2), None],
    },
    BoardSlots {
        board: Address::Board3,
        coils: [Some(3), Some(4)],
    },
];

impl Personality {
    /// Coil to board mapping for this topology.
    pub fn board_slots(self) -> &'static [BoardSlots] {
        match self {
            Self::FourCoil => &FOUR_COIL_SLOTS,
            Self::FiveCoil => &FIVE_COIL_SLOTS,
        }
    }
}

/// Drives the power level updates after start-up. Owns the heartbeat.
#[derive(Debug)]
pub struct ControlLoop<'a> {
    config: &'a ControllerConfig,
    heartbeat: Heartbeat,
}

impl<'a> ControlLoop<'a> {
    pub fn new(config: &'a ControllerConfig) -> Self {
        Self {
            config,
            heartbeat: Heartbeat::default(),
        }
    }

    pub const fn heartbeat(&self) -> Heartbeat {
        self.heartbeat
    }

    /// Sample every coil and send one power level frame per board.
    ///
    /// The heartbeat advances once per cycle. Boards whose levels are both
    /// out of range are skipped.
    /// # Errors
    /// Returns [`EncodeError::TransmitFault`] if the bus fails, the remaining
    /// boards of the cycle aren't sent.
    pub fn cycle<IO, S>(&mut self, encoder: &mut Encoder<IO>, source: &mut S) -> Result<(), EncodeError>
    where
        IO: Write,
        S: LevelSource + ?Sized,
    {
        let heartbeat = self.heartbeat;
        self.heartbeat.increment();

        let mut levels = [0u8; 5];
        for (coil, level) in levels
            .iter_mut()
            .take(self.config.personality.coil_count())
            .enumerate()
        {
            *level = source.sample(coil);
        }
        debug!("Cycle {}: levels {:?}", heartbeat.value(), levels);

        for slots in self.config.personality.board_slots() {
            let [coil1, coil2] = slots.coils.map(|c| c.map_or(0, |i| levels[i]));
            match encoder.set_power_levels(slots.board, coil1, coil2, heartbeat) {
                Ok(()) => {}
                Err(EncodeError::OutOfRange { .. }) => {
                    warn!("Skipping {:?}, levels {} {}", slots.board, coil1, coil2)
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Run `cycles` control cycles, or forever if `None`, with
    /// `config.control_period` between them.
    /// # Errors
    /// Stops at the first transmit fault, see [`cycle`](Self::cycle).
    pub fn run<IO, S, P>(
        &mut self,
        encoder: &mut Encoder<IO>,
        source: &mut S,
        pause: &mut P,
        cycles: Option<usize>,
    ) -> Result<(), EncodeError>
    where
        IO: Write,
        S: LevelSource + ?Sized,
        P: Pause,
    {
        let mut done = 0;
        while cycles.map_or(true, |n| done < n) {
            self.cycle(encoder, source)?;
            done += 1;
            pause.pause(self.config.control_period);
        }
        Ok(())
    }
}
