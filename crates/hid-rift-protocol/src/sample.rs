//! Packed 21-bit tri-axis sample format.
//!
//! Each inertial sample carries three 21-bit two's complement axes packed
//! big-endian into 8 bytes:
//!
//! | Axis | Bits of the 64-bit word |
//! |------|-------------------------|
//! | x    | 63..43                  |
//! | y    | 42..22                  |
//! | z    | 21..1                   |
//!
//! Bit 0 is unused. Decoding left-aligns each field into the top 21 bits of a
//! 32-bit word and arithmetic-shifts it back down, which sign-extends it.

/// Wire size of one packed tri-axis sample.
pub const PACKED_SAMPLE_LEN: usize = 8;

/// Smallest decodable axis value (`-2^20`).
pub const SAMPLE_MIN: i32 = -(1 << 20);
/// Largest decodable axis value (`2^20 - 1`).
pub const SAMPLE_MAX: i32 = (1 << 20) - 1;

const AXIS_MASK: u32 = 0x001F_FFFF;
const ALIGNED_MASK: u32 = AXIS_MASK << 11;

/// Unpack three signed 21-bit axes. Total over every input.
pub fn decode_sample(packed: &[u8; PACKED_SAMPLE_LEN]) -> [i32; 3] {
    let word = u64::from_be_bytes(*packed);

    // Truncating casts keep exactly the low 32 bits, which hold the aligned field.
    let x = (word >> 32) as u32 & ALIGNED_MASK;
    let y = (word >> 11) as u32 & ALIGNED_MASK;
    let z = (word << 10) as u32 & ALIGNED_MASK;

    [x, y, z].map(|aligned| aligned.cast_signed() >> 11)
}

/// Pack three axes, keeping the low 21 bits of each.
pub fn encode_sample(axes: [i32; 3]) -> [u8; PACKED_SAMPLE_LEN] {
    let [x, y, z] = axes.map(|axis| u64::from(axis.cast_unsigned() & AXIS_MASK));
    ((x << 43) | (y << 22) | (z << 1)).to_be_bytes()
}
