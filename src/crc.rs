//! CRC-16 used to authenticate every frame on the bus.
//!
//! The update step shifts right, so the lookup table is built from the
//! bit-reversed CCITT polynomial. The register starts at [`SEED`] and is not
//! inverted at the end.

/// Bit-reversed form of the CCITT polynomial 0x1021.
const POLYNOMIAL: u16 = 0x8408;

/// Initial register value.
pub const SEED: u16 = 0xE300;

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static TABLE: [u16; 256] = build_table();

/// Incremental checksum state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Crc16(u16);

impl Crc16 {
    pub const fn new() -> Self {
        Self(SEED)
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.0 = (self.0 >> 8) ^ TABLE[((self.0 ^ byte as u16) & 0xFF) as usize];
        }
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum of `data`, starting from [`SEED`].
pub fn checksum(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bit-at-a-time version of the same register, without the table.
    fn bitwise(data: &[u8]) -> u16 {
        let mut crc = SEED;
        for &byte in data {
            crc ^= byte as u16;
            for _ in 0..8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ POLYNOMIAL;
                } else {
                    crc >>= 1;
                }
            }
        }
        crc
    }

    #[test]
    fn test_empty_is_seed() {
        assert_eq!(checksum(&[]), 0xE300);
    }

    #[test]
    fn test_table() {
        assert_eq!(TABLE[0], 0x0000);
        assert_eq!(TABLE[1], 0x1189);
        assert_eq!(TABLE[0x80], 0x8408);
        assert_eq!(TABLE[0xFF], 0x0F78);
    }

    #[test]
    fn test_against_bitwise() {
        let frames: [&[u8]; 4] = [
            &[0x00],
            &[0xE2, 0x88, 0x0A, 0x87, 0x26, 0x02, 0x02],
            &[0xE2, 0x89, 0x0B, 0x87, 0x28, 0x13, 0x00, 0xE1],
            b"123456789",
        ];
        for data in frames.iter() {
            assert_eq!(checksum(data), bitwise(data), "data {:02x?}", data);
        }
        let all: Vec<u8> = (0..=u8::MAX).collect();
        assert_eq!(checksum(&all), bitwise(&all));
    }

    #[test]
    fn test_incremental() {
        let data = [0xE2, 0x88, 0x0B, 0x87, 0x28, 0x05, 0x07, 0x10];
        let mut crc = Crc16::default();
        crc.update(&data[..3]);
        crc.update(&data[3..]);
        assert_eq!(crc.value(), checksum(&data));
    }
}
