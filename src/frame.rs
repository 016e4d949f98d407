//! Frame layout and escaping.
//!
//! A frame on the wire looks like this:
//!
//! ```text
//! SOF | DST | LEN | SRC | CMD | PAYLOAD.. | CRC_LO | CRC_HI | EOF | ACK
//! ```
//!
//! `LEN` counts the logical bytes from SOF through EOF. The checksum covers
//! SOF through the last payload byte. Every byte between SOF and EOF that
//! collides with a control code is preceded by an escape marker, which adds
//! to the wire length but not to `LEN`.

use arrayvec::ArrayVec;
use snafu::{ensure, Snafu};

use crate::codes::{needs_escape, ACK, EOF, ESC, FRAME_OVERHEAD, SOF};
use crate::crc::Crc16;
use crate::types::Address;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_LEN: usize = 32;

// SOF, worst case every escapable byte doubled, EOF, ACK
const MAX_WIRE_LEN: usize = 1 + 2 * (FRAME_OVERHEAD - 2 + MAX_PAYLOAD_LEN) + 2;

type Payload = ArrayVec<u8, MAX_PAYLOAD_LEN>;
type WireBytes = ArrayVec<u8, MAX_WIRE_LEN>;

/// Error type for this module
#[derive(Debug, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrameError {
    /// The payload doesn't fit in a single frame.
    #[snafu(display("Payload of {} bytes exceeds {} bytes", len, MAX_PAYLOAD_LEN))]
    PayloadTooLong { len: usize },
}

/// The fixed four leading bytes of every frame, after SOF has been stripped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub destination: Address,
    pub length: u8,
    pub source: Address,
}

/// A complete frame, ready to be written to the bus.
#[derive(Debug, Clone)]
pub struct Frame {
    header: FrameHeader,
    command: u8,
    payload: Payload,
    checksum: u16,
    wire: WireBytes,
}

impl Frame {
    /// Lay out a frame from this controller to `destination`.
    /// # Errors
    /// Returns [`FrameError::PayloadTooLong`] if `payload` is longer than [`MAX_PAYLOAD_LEN`].
    pub fn build(destination: Address, command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        ensure!(
            payload.len() <= MAX_PAYLOAD_LEN,
            PayloadTooLongSnafu { len: payload.len() }
        );
        let header = FrameHeader {
            destination,
            // fits, MAX_PAYLOAD_LEN + FRAME_OVERHEAD < 256
            length: (payload.len() + FRAME_OVERHEAD) as u8,
            source: Address::Controller,
        };

        let mut crc = Crc16::new();
        let lead = [
            SOF,
            header.destination.to_byte(),
            header.length,
            header.source.to_byte(),
            command,
        ];
        crc.update(&lead);
        crc.update(payload);
        let checksum = crc.value();
        let crc_bytes = checksum.to_le_bytes();

        let mut wire = WireBytes::new();
        wire.push(SOF);
        for &byte in lead[1..].iter().chain(payload).chain(&crc_bytes) {
            if needs_escape(byte) {
                wire.push(ESC);
            }
            wire.push(byte);
        }
        wire.push(EOF);
        wire.push(ACK);

        Ok(Self {
            header,
            command,
            payload: payload.iter().copied().collect(),
            checksum,
            wire,
        })
    }

    pub const fn header(&self) -> FrameHeader {
        self.header
    }

    pub const fn command(&self) -> u8 {
        self.command
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Checksum over the unescaped bytes from SOF through the payload.
    pub const fn checksum(&self) -> u16 {
        self.checksum
    }

    /// The bytes to transmit, escape markers included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.wire
    }

    /// Number of bytes on the wire, which is at least `header().length + 1`.
    pub fn len(&self) -> usize {
        self.wire.len()
    }

    /// Always false, a frame carries at least its header and trailer.
    pub fn is_empty(&self) -> bool {
        self.wire.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
