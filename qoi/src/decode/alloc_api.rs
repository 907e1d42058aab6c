use crate::{
    decode::{DecodeError, DecodeOutput, QoiDecodeContext},
    Header, Rgba,
};
use alloc::vec::Vec;

impl QoiDecodeContext {
    /// Decodes a complete QOI image into a freshly allocated pixel buffer.
    pub fn decode_to_vec(data: &[u8]) -> Result<(Header, Vec<Rgba>), DecodeError> {
        let mut pixels = Vec::new();
        let header = Self::decode(data, VecDecodeOutput::new(&mut pixels))?;
        Ok((header, pixels))
    }
}

/// Appends decoded pixels to a `Vec<Rgba>`.
pub struct VecDecodeOutput<'a> {
    output: &'a mut Vec<Rgba>,
    start: usize,
}

impl<'a> VecDecodeOutput<'a> {
    #[inline]
    pub fn new(output: &'a mut Vec<Rgba>) -> Self {
        let start = output.len();
        Self { output, start }
    }
}

impl DecodeOutput for VecDecodeOutput<'_> {
    #[inline]
    fn write_pixel(&mut self, pixel: Rgba) {
        self.output.push(pixel);
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        None
    }

    #[inline]
    fn reserve(&mut self, pixels: usize) {
        self.output.reserve(pixels);
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        self.output.len() - self.start
    }
}

/// Appends decoded pixels to a byte buffer as packed RGBA8, the layout raster libraries expect.
pub struct BytesDecodeOutput<'a> {
    output: &'a mut Vec<u8>,
    start: usize,
}

impl<'a> BytesDecodeOutput<'a> {
    #[inline]
    pub fn new(output: &'a mut Vec<u8>) -> Self {
        let start = output.len();
        Self { output, start }
    }
}

impl DecodeOutput for BytesDecodeOutput<'_> {
    #[inline]
    fn write_pixel(&mut self, pixel: Rgba) {
        self.output.extend_from_slice(&<[u8; 4]>::from(pixel));
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        None
    }

    #[inline]
    fn reserve(&mut self, pixels: usize) {
        self.output.reserve(pixels.saturating_mul(4));
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        (self.output.len() - self.start) / 4
    }
}
