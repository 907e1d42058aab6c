use crate::{
    color_array::ColorArray, consts::QOI_MAX_RUN, decode::ops::{luma_diff, small_diff}, op::Op,
    Header, Rgba,
};
use snafu::{ensure, OptionExt, Snafu};

mod ops;
pub mod streaming;

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
pub use alloc_api::*;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecodeError {
    #[snafu(display("invalid magic {magic:?}, expected \"qoif\""))]
    InvalidMagic { magic: [u8; 4] },
    #[snafu(display("invalid channel count {channels}, expected 3 or 4"))]
    InvalidChannels { channels: u8 },
    #[snafu(display("invalid colorspace {colorspace}, expected 0 or 1"))]
    InvalidColorspace { colorspace: u8 },
    #[snafu(display("stream ended before every pixel was decoded"))]
    UnexpectedEof,
    #[snafu(display("output holds {available} pixels, but the image has {required}"))]
    OutputTooSmall { required: usize, available: usize },
    #[snafu(display("a {width}x{height} image does not fit in memory on this platform"))]
    ImageTooLarge { width: u32, height: u32 },
}

impl DecodeError {
    /// Whether the error comes from an invalid header field rather than from the op stream.
    pub fn is_malformed_header(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidMagic { .. }
                | DecodeError::InvalidChannels { .. }
                | DecodeError::InvalidColorspace { .. }
        )
    }
}

/// State carried from one pixel to the next while decoding a single image.
#[derive(Debug, Clone, Copy)]
pub struct QoiDecodeContext {
    prev: Rgba,
    /// Repeats of `prev` still owed by the last QOI_OP_RUN.
    run: u8,
    arr: ColorArray,
}

impl QoiDecodeContext {
    pub(crate) const fn new() -> Self {
        Self {
            prev: Rgba::SEED,
            run: 0,
            arr: ColorArray::new(),
        }
    }

    /// Decodes a complete QOI image (header and op stream) into `output`.
    ///
    /// Returns the parsed header. The end marker and anything after the last pixel's op are not
    /// read. On error, `output` may already hold some of the pixels.
    pub fn decode(data: &[u8], mut output: impl DecodeOutput) -> Result<Header, DecodeError> {
        let (header, data) = Header::parse(data)?;
        let pixel_count = slice_pixel_count(&header, data.len())?;

        if let Some(available) = output.max_len() {
            ensure!(
                available >= pixel_count,
                OutputTooSmallSnafu {
                    required: pixel_count,
                    available
                }
            );
        }
        output.reserve(pixel_count);

        let mut data = data.iter().copied();
        let next = || data.next().ok_or(DecodeError::UnexpectedEof);
        Self::new().decode_pixels(pixel_count, next, &mut output)?;

        log::debug!(
            "decoded {}x{} image ({:?}, {:?})",
            header.width,
            header.height,
            header.channels,
            header.colorspace
        );

        Ok(header)
    }

    /// Runs the op stream for exactly `pixel_count` pixels, pulling bytes from `next`.
    pub(crate) fn decode_pixels<E>(
        &mut self,
        pixel_count: usize,
        mut next: impl FnMut() -> Result<u8, E>,
        output: &mut impl DecodeOutput,
    ) -> Result<(), E> {
        for _ in 0..pixel_count {
            if self.run > 0 {
                self.run -= 1;
                output.write_pixel(self.prev);
                continue;
            }

            let pixel = match Op::from_tag(next()?) {
                Op::Rgb => {
                    let [r, g, b] = [next()?, next()?, next()?];
                    Rgba {
                        r,
                        g,
                        b,
                        a: self.prev.a,
                    }
                }
                Op::Rgba => {
                    let [r, g, b, a] = [next()?, next()?, next()?, next()?];
                    Rgba { r, g, b, a }
                }
                Op::Index(index) => {
                    // already in arr
                    self.prev = self.arr.lookup(index);
                    output.write_pixel(self.prev);
                    continue;
                }
                Op::Diff(byte) => small_diff(self.prev, byte),
                Op::Luma(byte) => luma_diff(self.prev, byte, next()?),
                Op::Run(run) => {
                    // this pixel is the first of the run, `run` more follow
                    self.run = run;
                    output.write_pixel(self.prev);
                    continue;
                }
            };

            self.arr.store(pixel);
            self.prev = pixel;
            output.write_pixel(pixel);
        }

        Ok(())
    }
}

/// Pixel count of an image whose op stream is `available_bytes` long.
///
/// A single op byte produces at most [`QOI_MAX_RUN`] pixels, so larger claims are truncated
/// streams and are rejected before anything gets allocated.
fn slice_pixel_count(header: &Header, available_bytes: usize) -> Result<usize, DecodeError> {
    let pixel_count = header.pixel_count();
    ensure!(
        pixel_count <= available_bytes as u64 * u64::from(QOI_MAX_RUN),
        UnexpectedEofSnafu
    );

    usize::try_from(pixel_count)
        .ok()
        .context(ImageTooLargeSnafu {
            width: header.width,
            height: header.height,
        })
}

/// Destination for decoded pixels, in raster order.
pub trait DecodeOutput {
    fn write_pixel(&mut self, pixel: Rgba);

    /// Returns the maximum number of pixels that can be written to the output buffer.
    ///
    /// `None` if the output buffer is unbounded.
    fn max_len(&self) -> Option<usize>;

    /// Hint that `pixels` more pixels are about to be written.
    fn reserve(&mut self, _pixels: usize) {}

    fn current_output_position(&self) -> usize;
}

impl<T: DecodeOutput + ?Sized> DecodeOutput for &mut T {
    #[inline]
    fn write_pixel(&mut self, pixel: Rgba) {
        (**self).write_pixel(pixel)
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        (**self).max_len()
    }

    #[inline]
    fn reserve(&mut self, pixels: usize) {
        (**self).reserve(pixels)
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        (**self).current_output_position()
    }
}

/// Writes into a caller-provided pixel slice.
///
/// [`QoiDecodeContext::decode`] rejects images that don't fit. Pixels written past the end of the
/// slice by other callers are dropped.
pub struct SliceDecodeOutput<'a> {
    output: &'a mut [Rgba],
    output_idx: usize,
}

impl<'a> SliceDecodeOutput<'a> {
    #[inline]
    pub fn new(slice: &'a mut [Rgba]) -> Self {
        Self {
            output: slice,
            output_idx: 0,
        }
    }
}

impl DecodeOutput for SliceDecodeOutput<'_> {
    #[inline]
    fn write_pixel(&mut self, pixel: Rgba) {
        if let Some(slot) = self.output.get_mut(self.output_idx) {
            *slot = pixel;
        }
        self.output_idx += 1;
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        Some(self.output.len())
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        self.output_idx
    }
}
