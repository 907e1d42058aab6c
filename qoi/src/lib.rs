//! Encoder and decoder for the [Quite OK Image format](https://qoiformat.org/).
//!
//! QOI losslessly compresses 8-bit RGBA rasters into a byte stream made of a fixed 14-byte header,
//! a sequence of variable-length operations, and an 8-byte end marker.
//!
//! # Header
//!
//! - 4-byte magic: `qoif`
//! - u32be width
//! - u32be height
//! - u8 channels (3 = RGB, 4 = RGBA)
//! - u8 colorspace (0 = sRGB with linear alpha, 1 = all channels linear)
//!
//! The channel count and colorspace are informative only. Decoding always yields RGBA pixels whose
//! alpha is driven by the operation stream, and encoding always writes `channels = 4`,
//! `colorspace = 0`.
//!
//! # Color array
//!
//! Encoder and decoder both keep a 64-entry array of previously seen pixels, addressed by
//! `(r * 3 + g * 5 + b * 7 + a * 11) % 64`. Both sides apply the same update rule to the same pixel
//! sequence, so the arrays never need to be transmitted.
//!
//! # Stream format
//!
//! See [consts] for the different operation types.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod color_array;
pub mod decode;
pub mod encode;
pub mod header;
pub mod op;
pub mod utils;

pub use color_array::ColorArray;
pub use decode::{DecodeError, DecodeOutput, QoiDecodeContext};
#[cfg(feature = "std")]
pub use decode::ReadError;
#[cfg(feature = "std")]
pub use encode::EncodeError;
#[cfg(feature = "alloc")]
pub use encode::EncodeToVecError;
pub use encode::{max_encoded_len, QoiEncodeContext};
pub use header::{Channels, Colorspace, Header};
pub use op::Op;

/// A single 8-bit RGBA pixel. Channel arithmetic wraps modulo 256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Value of every color array slot before anything is stored.
    pub const ZERO: Rgba = Rgba::new(0, 0, 0, 0);

    /// The "previous pixel" both encoder and decoder start from.
    pub const SEED: Rgba = Rgba::new(0, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Rgba {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    #[inline]
    fn from(Rgba { r, g, b, a }: Rgba) -> Self {
        [r, g, b, a]
    }
}

pub mod consts {
    /// Re-emit a pixel from the color array.
    ///
    /// ```plain
    /// .- QOI_OP_INDEX ----------.
    /// |         Byte[0]         |
    /// |  7  6  5  4  3  2  1  0 |
    /// |-------+-----------------|
    /// |  0  0 |     index       |
    /// `-------------------------`
    /// ```
    ///
    /// - 2-bit tag b00
    /// - 6-bit index into the color array: 0..63
    /// - The pixel is already in the color array, so nothing is stored.
    pub const QOI_OP_INDEX: u8 = 0b0000_0000;

    /// Calculate a pixel based on a 2-bit difference from the previous pixel.
    ///
    /// ```plain
    /// .- QOI_OP_DIFF -----------.
    /// |         Byte[0]         |
    /// |  7  6  5  4  3  2  1  0 |
    /// |-------+-----+-----+-----|
    /// |  0  1 |  dr |  dg |  db |
    /// `-------------------------`
    /// ```
    ///
    /// - 2-bit tag b01
    /// - 2-bit red channel difference from the previous pixel between -2..1, stored with a bias
    ///   of 2
    /// - 2-bit green channel difference from the previous pixel between -2..1, stored with a bias
    ///   of 2
    /// - 2-bit blue channel difference from the previous pixel between -2..1, stored with a bias
    ///   of 2
    ///
    /// Differences wrap around, so `1 - 2` is `255`. Alpha is unchanged.
    pub const QOI_OP_DIFF: u8 = 0b0100_0000;

    /// Calculate a pixel based on a 6-bit green-channel difference from the previous pixel, and
    /// differences to the green-channel difference for red and blue.
    ///
    ///  ```plain
    /// .- QOI_OP_LUMA -------------------------------------.
    /// |         Byte[0]         |         Byte[1]         |
    /// |  7  6  5  4  3  2  1  0 |  7  6  5  4  3  2  1  0 |
    /// |-------+-----------------+-------------+-----------|
    /// |  1  0 |  green diff     |   dr - dg   |  db - dg  |
    /// `---------------------------------------------------`
    /// ```
    ///
    /// - 2-bit tag b10
    /// - 6-bit green channel difference from the previous pixel (`-32..31`), stored with a bias of
    ///   32
    /// - 4-bit red channel difference minus green channel difference (`-8..7`), stored with a bias
    ///   of 8
    /// - 4-bit blue channel difference minus green channel difference (`-8..7`), stored with a bias
    ///   of 8
    pub const QOI_OP_LUMA: u8 = 0b1000_0000;

    /// Repeats the previous pixel.
    ///
    /// ```plain
    /// .- QOI_OP_RUN ------------.
    /// |         Byte[0]         |
    /// |  7  6  5  4  3  2  1  0 |
    /// |-------+-----------------|
    /// |  1  1 |       run       |
    /// `-------------------------`
    /// ```
    ///
    /// - 2-bit tag b11
    /// - 6-bit run-length repeating the previous pixel: 1..62
    /// - The run-length is stored with a bias of -1. Note that the run-lengths 63 and 64 (`b111110`
    ///   and `b111111`) are illegal as they are occupied by the QOI_OP_RGB and QOI_OP_RGBA tag.
    pub const QOI_OP_RUN: u8 = 0b1100_0000;

    /// Emits a raw RGB pixel, keeping the alpha of the previous pixel.
    ///
    /// ```plain
    /// .- QOI_OP_RGB ------------------------------------------.
    /// |         Byte[0]         | Byte[1] | Byte[2] | Byte[3] |
    /// |  7  6  5  4  3  2  1  0 | 7 .. 0  | 7 .. 0  | 7 .. 0  |
    /// |-------------------------+---------+---------+---------|
    /// |  1  1  1  1  1  1  1  0 |   red   |  green  |  blue   |
    /// `-------------------------------------------------------`
    /// ```
    ///
    /// - 8-bit tag b11111110
    pub const QOI_OP_RGB: u8 = 0b1111_1110;

    /// Emits a raw RGBA pixel.
    ///
    /// ```plain
    /// .- QOI_OP_RGBA ---------------------------------------------------.
    /// |         Byte[0]         | Byte[1] | Byte[2] | Byte[3] | Byte[4] |
    /// |  7  6  5  4  3  2  1  0 | 7 .. 0  | 7 .. 0  | 7 .. 0  | 7 .. 0  |
    /// |-------------------------+---------+---------+---------+---------|
    /// |  1  1  1  1  1  1  1  1 |   red   |  green  |  blue   |  alpha  |
    /// `-----------------------------------------------------------------`
    /// ```
    ///
    /// - 8-bit tag b11111111
    pub const QOI_OP_RGBA: u8 = 0b1111_1111;

    /// Mask selecting the 2-bit tag of the short operations.
    pub const QOI_MASK_2: u8 = 0b1100_0000;

    pub const QOI_MAGIC: [u8; 4] = *b"qoif";

    pub const QOI_HEADER_SIZE: usize = 14;

    /// Bytes closing every stream.
    pub const QOI_END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

    /// Longest run a single QOI_OP_RUN can describe.
    pub const QOI_MAX_RUN: u8 = 62;
}
