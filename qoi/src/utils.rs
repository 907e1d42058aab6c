use crate::Rgba;

pub use byteorder::{BigEndian, ByteOrder};

/// Color array position of a pixel: `(r * 3 + g * 5 + b * 7 + a * 11) % 64`.
#[inline]
pub const fn hash(pixel: Rgba) -> u8 {
    // 64 divides 256, so wrapping u8 arithmetic gives the same remainder as the full sum.
    let sum = pixel
        .r
        .wrapping_mul(3)
        .wrapping_add(pixel.g.wrapping_mul(5))
        .wrapping_add(pixel.b.wrapping_mul(7))
        .wrapping_add(pixel.a.wrapping_mul(11));
    sum & 0b11_1111 // % 64
}

/// Computes the signed, wrapping difference `a - b` of two channel values.
#[inline]
pub const fn diff(a: u8, b: u8) -> i8 {
    a.wrapping_sub(b) as i8
}

/// Applies a signed difference to a channel value, wrapping around.
#[inline]
pub const fn apply_diff(channel: u8, d: i8) -> u8 {
    channel.wrapping_add(d as u8)
}
