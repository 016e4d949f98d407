//! Transmit side of the GEA bus, used to drive induction generator boards.
//!
//! The crate builds GEA frames (header, payload, CRC-16, escaping of control
//! codes) and writes them to any [`std::io::Write`] bus transport. On top of
//! that sit the start-up sequence for the two supported board topologies and
//! a periodic control loop that forwards operator power levels.
//!
//! The controller never reads from the bus. Boards are fixed per topology,
//! see [`Personality`].
//!
//! # Example
//!
//! ```
//! use gea_proto::{initialize, ControllerConfig, Encoder, Personality, Pause};
//! use std::time::Duration;
//!
//! struct NoWait;
//! impl Pause for NoWait {
//!     fn pause(&mut self, _: Duration) {}
//! }
//!
//! let config = ControllerConfig::new(Personality::from_input(false));
//! let mut encoder = Encoder::new(Vec::new()); // a serial port in real use
//! let report = initialize(&mut encoder, &config, &mut NoWait);
//! assert_eq!(report.sent, 4);
//! ```

pub mod codes;
pub mod config;
pub mod crc;
pub mod driver;
pub mod encoder;
pub mod frame;
pub mod sequencer;
pub mod types;

pub use crate::codes::needs_escape;
pub use crate::config::{ControllerConfig, Personality};
pub use crate::crc::checksum;
pub use crate::driver::{ControlLoop, LevelSource};
pub use crate::encoder::{Command, EncodeError, Encoder};
pub use crate::frame::{Frame, FrameHeader};
pub use crate::sequencer::{initialize, InitStep, Pause, ThreadSleep};
pub use crate::types::{Address, CoilProfile, Heartbeat};
