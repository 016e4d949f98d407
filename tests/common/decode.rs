//! Reference decoder for captured bus traffic, independent of the encoder.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{all_consuming, verify};
use nom::multi::many_till;
use nom::number::complete::u8;
use nom::sequence::preceded;
use nom::IResult;

const ESC: u8 = 0xE0;
const ACK: u8 = 0xE1;
const SOF: u8 = 0xE2;
const EOF: u8 = 0xE3;

const SEED: u16 = 0xE300;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DecodedFrame {
    pub destination: u8,
    pub length: u8,
    pub source: u8,
    pub command: u8,
    pub payload: Vec<u8>,
    pub checksum: u16,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    Malformed,
    BadLength { declared: u8, actual: usize },
    BadChecksum { received: u16, computed: u16 },
}

fn is_control(b: u8) -> bool {
    (ESC..=EOF).contains(&b)
}

// Bit-at-a-time CRC, reflected CCITT polynomial.
pub fn reference_crc(data: &[u8]) -> u16 {
    let mut crc = SEED;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if (crc & 1) == 1 { (crc >> 1) ^ 0x8408 } else { crc >> 1 };
        }
    }
    crc
}

fn data_byte(buf: &[u8]) -> IResult<&[u8], u8> {
    alt((
        preceded(tag(&[ESC][..]), verify(u8, |b: &u8| is_control(*b))),
        verify(u8, |b: &u8| !is_control(*b)),
    ))(buf)
}

// Unescaped bytes between SOF and EOF.
fn raw_frame(buf: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let (buf, (body, _eof)) = preceded(tag(&[SOF][..]), many_till(data_byte, tag(&[EOF][..])))(buf)?;
    let (buf, _ack) = tag(&[ACK][..])(buf)?;
    Ok((buf, body))
}

fn check(body: Vec<u8>) -> Result<DecodedFrame, DecodeError> {
    if body.len() < 6 {
        return Err(DecodeError::Malformed);
    }
    let declared = body[1];
    // SOF and EOF count towards the declared length
    if declared as usize != body.len() + 2 {
        return Err(DecodeError::BadLength {
            declared,
            actual: body.len() + 2,
        });
    }
    let (logical, crc) = body.split_at(body.len() - 2);
    let received = u16::from_le_bytes([crc[0], crc[1]]);
    let mut covered = vec![SOF];
    covered.extend_from_slice(logical);
    let computed = reference_crc(&covered);
    if received != computed {
        return Err(DecodeError::BadChecksum { received, computed });
    }
    Ok(DecodedFrame {
        destination: logical[0],
        length: logical[1],
        source: logical[2],
        command: logical[3],
        payload: logical[4..].to_vec(),
        checksum: received,
    })
}

/// Decode exactly one frame.
pub fn decode_frame(wire: &[u8]) -> Result<DecodedFrame, DecodeError> {
    let (_, body) = all_consuming(raw_frame)(wire).map_err(|_| DecodeError::Malformed)?;
    check(body)
}

/// Split a captured byte stream into frames.
pub fn decode_stream(mut wire: &[u8]) -> Result<Vec<DecodedFrame>, DecodeError> {
    let mut frames = Vec::new();
    while !wire.is_empty() {
        let (rest, body) = raw_frame(wire).map_err(|_| DecodeError::Malformed)?;
        frames.push(check(body)?);
        wire = rest;
    }
    Ok(frames)
}
