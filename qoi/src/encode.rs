use crate::{
    color_array::ColorArray,
    consts::*,
    utils::{diff, hash},
    Rgba,
};
use core::ops::Deref;

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
pub use alloc_api::*;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

/// Worst-case size of an encoded `width` x `height` image: every pixel as QOI_OP_RGBA, plus the
/// header and end marker.
///
/// `None` if that doesn't fit in a `usize`.
pub fn max_encoded_len(width: u32, height: u32) -> Option<usize> {
    let pixel_count = usize::try_from(u64::from(width) * u64::from(height)).ok()?;
    pixel_count
        .checked_mul(5)?
        .checked_add(QOI_HEADER_SIZE + QOI_END_MARKER.len())
}

#[inline]
fn dimensions_match(width: u32, height: u32, pixel_count: usize) -> bool {
    u64::from(width) * u64::from(height) == pixel_count as u64
}

/// The bytes emitted for a single pixel: a pending QOI_OP_RUN, if one had to be flushed, followed by
/// the op for the pixel itself. Empty while a run is accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk {
    bytes: [u8; 6],
    len: u8,
}

impl Chunk {
    const fn new() -> Self {
        Self {
            bytes: [0; 6],
            len: 0,
        }
    }

    #[inline]
    fn extend(&mut self, bytes: &[u8]) {
        let start = usize::from(self.len);
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len() as u8;
    }

    #[inline]
    fn as_slice(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl Deref for Chunk {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// State carried from one pixel to the next while encoding a single image.
///
/// Only ever created inside an encoding call, so every image starts from the seed pixel and an
/// empty color array.
#[derive(Debug, Clone, Copy)]
pub struct QoiEncodeContext {
    prev: Rgba,
    /// Pixels equal to `prev` seen but not yet written as QOI_OP_RUN.
    run: u8,
    arr: ColorArray,
}

impl QoiEncodeContext {
    pub(crate) const fn new() -> Self {
        Self {
            prev: Rgba::SEED,
            run: 0,
            arr: ColorArray::new(),
        }
    }
}

impl QoiEncodeContext {
    /// Selects the op for the next pixel in raster order.
    ///
    /// `last` must be set for the final pixel of the image so that a pending run gets flushed.
    pub(crate) fn encode_pixel(&mut self, pixel: Rgba, last: bool) -> Chunk {
        let mut chunk = Chunk::new();

        if pixel == self.prev {
            self.run += 1;
            if self.run == QOI_MAX_RUN || last {
                chunk.extend(&[QOI_OP_RUN | (self.run - 1)]);
                self.run = 0;
            }

            // already same as prev and already in color array
            return chunk;
        }

        if self.run > 0 {
            chunk.extend(&[QOI_OP_RUN | (self.run - 1)]);
            self.run = 0;
        }

        let prev = self.prev;
        self.prev = pixel;

        let index = hash(pixel);
        if self.arr.lookup(index) == pixel {
            chunk.extend(&[QOI_OP_INDEX | index]);

            // already in arr
            return chunk;
        }
        self.arr.store(pixel);

        let Rgba { r, g, b, a } = pixel;
        if a != prev.a {
            chunk.extend(&[QOI_OP_RGBA, r, g, b, a]);
            return chunk;
        }

        let (r_diff, g_diff, b_diff) = (diff(r, prev.r), diff(g, prev.g), diff(b, prev.b));

        if matches!((r_diff, g_diff, b_diff), (-2..=1, -2..=1, -2..=1)) {
            let mut b = QOI_OP_DIFF;
            b |= ((r_diff + 2) << 4) as u8;
            b |= ((g_diff + 2) << 2) as u8;
            b |= (b_diff + 2) as u8;
            chunk.extend(&[b]);
            return chunk;
        }

        let rg_diff = r_diff.wrapping_sub(g_diff);
        let bg_diff = b_diff.wrapping_sub(g_diff);

        if matches!((rg_diff, g_diff, bg_diff), (-8..=7, -32..=31, -8..=7)) {
            chunk.extend(&[
                QOI_OP_LUMA | (g_diff + 32) as u8,
                ((rg_diff + 8) as u8) << 4 | (bg_diff + 8) as u8,
            ]);
        } else {
            chunk.extend(&[QOI_OP_RGB, r, g, b]);
        }

        chunk
    }

    /// Encodes `pixels` followed by the end marker, handing every non-empty chunk to `w`.
    pub(crate) fn encode_pixels_with<E>(
        &mut self,
        pixels: &[Rgba],
        mut w: impl FnMut(&[u8]) -> Result<(), E>,
    ) -> Result<(), E> {
        let last = pixels.len().saturating_sub(1);

        for (i, &pixel) in pixels.iter().enumerate() {
            let chunk = self.encode_pixel(pixel, i == last);
            if !chunk.is_empty() {
                w(&chunk)?;
            }
        }

        w(&QOI_END_MARKER)
    }
}
