//! Start-up configuration of the controller.

use std::time::Duration;

/// Default bus speed.
pub const BAUD_RATE: u32 = 19_200;
/// Default spacing between frames during start-up.
pub const FRAME_SPACING: Duration = Duration::from_millis(100);
/// Default time between two control cycles.
pub const CONTROL_PERIOD: Duration = Duration::from_millis(200);

/// Hardware topology, selected by a single input signal at boot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Personality {
    /// Four coils on two generator boards.
    FourCoil,
    /// Five coils on three generator boards.
    FiveCoil,
}

impl Personality {
    /// Map the personality input to a topology, `true` selects five coils.
    pub const fn from_input(five_coil: bool) -> Self {
        if five_coil {
            Self::FiveCoil
        } else {
            Self::FourCoil
        }
    }

    pub const fn coil_count(self) -> usize {
        match self {
            Self::FourCoil => 4,
            Self::FiveCoil => 5,
        }
    }

    pub const fn board_count(self) -> usize {
        match self {
            Self::FourCoil => 2,
            Self::FiveCoil => 3,
        }
    }
}

/// Immutable controller configuration, built once at start-up and passed to
/// the sequencer and control loop.
///
/// ```
/// use gea_proto::{ControllerConfig, Personality};
/// use std::time::Duration;
///
/// let config = ControllerConfig::new(Personality::from_input(true))
///     .with_port("/dev/ttyUSB1")
///     .with_frame_spacing(Duration::from_millis(50));
/// assert_eq!(config.personality.coil_count(), 5);
/// assert_eq!(config.baud_rate, 19200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub personality: Personality,
    /// Serial device the bus is attached to.
    pub port: String,
    pub baud_rate: u32,
    /// Pause after every start-up frame.
    pub frame_spacing: Duration,
    /// Pause between control cycles.
    pub control_period: Duration,
}

impl ControllerConfig {
    pub fn new(personality: Personality) -> Self {
        Self {
            personality,
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: BAUD_RATE,
            frame_spacing: FRAME_SPACING,
            control_period: CONTROL_PERIOD,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    #[must_use]
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    #[must_use]
    pub fn with_frame_spacing(mut self, spacing: Duration) -> Self {
        self.frame_spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_control_period(mut self, period: Duration) -> Self {
        self.control_period = period;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new(Personality::FourCoil)
    }
}
