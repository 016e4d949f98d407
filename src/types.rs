//! This module defines the fixed device addresses, coil profiles and the
//! heartbeat counter that appear in GEA frames.

use snafu::Snafu;

/// Error type for this module
#[derive(Debug, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The byte isn't a known device address.
    #[snafu(display("Invalid address {:#04x}", value))]
    InvalidAddress { value: u8 },
    /// The byte isn't a known coil profile.
    #[snafu(display("Invalid coil profile {:#04x}", value))]
    InvalidProfile { value: u8 },
}

/// A device on the bus. Addresses are fixed, there is no discovery.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash)]
#[repr(u8)]
pub enum Address {
    /// This controller, the source of every frame.
    Controller = 0x87,
    Board1 = 0x88,
    Board2 = 0x89,
    Board3 = 0x8A,
}

impl Address {
    pub const fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        address.to_byte()
    }
}

impl TryFrom<u8> for Address {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x87 => Ok(Self::Controller),
            0x88 => Ok(Self::Board1),
            0x89 => Ok(Self::Board2),
            0x8A => Ok(Self::Board3),
            _ => InvalidAddressSnafu { value }.fail(),
        }
    }
}

/// Wattage class of the coil fitted at a position on a generator board.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[repr(u8)]
pub enum CoilProfile {
    /// No coil fitted.
    None = 0x00,
    W1800 = 0x01,
    W2500 = 0x02,
    W3200 = 0x03,
    W3700 = 0x04,
}

impl CoilProfile {
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Rated power in watts, zero for [`CoilProfile::None`].
    pub const fn watts(self) -> u16 {
        match self {
            Self::None => 0,
            Self::W1800 => 1800,
            Self::W2500 => 2500,
            Self::W3200 => 3200,
            Self::W3700 => 3700,
        }
    }
}

impl TryFrom<u8> for CoilProfile {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::None),
            0x01 => Ok(Self::W1800),
            0x02 => Ok(Self::W2500),
            0x03 => Ok(Self::W3200),
            0x04 => Ok(Self::W3700),
            _ => InvalidProfileSnafu { value }.fail(),
        }
    }
}

/// Rolling counter carried in every power level frame, so boards can
/// tell a fresh command from a repeated one.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default, Hash)]
#[repr(transparent)]
pub struct Heartbeat(u8);

impl Heartbeat {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// The following heartbeat, wrapping from 255 to 0.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn increment(&mut self) {
        *self = self.next();
    }
}

impl From<u8> for Heartbeat {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
