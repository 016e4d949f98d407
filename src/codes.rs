//! Byte values with a fixed meaning on the GEA bus.

/// Escape marker, inserted before any data byte that collides with a control code.
pub const ESC: u8 = 0xE0;
/// Acknowledgment marker, last byte of every frame.
pub const ACK: u8 = 0xE1;
/// Start of frame.
pub const SOF: u8 = 0xE2;
/// End of frame.
pub const EOF: u8 = 0xE3;

/// Set the coil profiles of a generator board.
pub const SET_BOARD_CONFIG: u8 = 0x26;
/// Set the power levels of both coils on a generator board.
pub const SET_PWR_LEVELS: u8 = 0x28;

/// Bytes in a frame besides the payload that count towards the length field:
/// SOF, destination, length, source, command, two checksum bytes and EOF.
pub const FRAME_OVERHEAD: usize = 8;

/// Declared length of a `SET_BOARD_CONFIG` frame.
pub const BOARD_CONFIG_LEN: u8 = 0x0A;
/// Declared length of a `SET_PWR_LEVELS` frame.
pub const PWR_LEVELS_LEN: u8 = 0x0B;

/// Returns true if `byte` is one of the four control codes and must be
/// preceded by [`ESC`] when it appears inside a frame.
#[inline]
pub const fn needs_escape(byte: u8) -> bool {
    matches!(byte, ESC | ACK | SOF | EOF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_escape() {
        for byte in 0..=u8::MAX {
            let expected = (0xE0..=0xE3).contains(&byte);
            assert_eq!(needs_escape(byte), expected, "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_declared_lengths() {
        assert_eq!(FRAME_OVERHEAD + 2, BOARD_CONFIG_LEN as usize);
        assert_eq!(FRAME_OVERHEAD + 3, PWR_LEVELS_LEN as usize);
    }
}
