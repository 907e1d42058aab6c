use crate::{
    encode::{dimensions_match, QoiEncodeContext},
    Header, Rgba,
};
use alloc::vec::Vec;
use core::convert::Infallible;
use snafu::{ensure, Snafu};

#[derive(Debug, Snafu)]
pub enum EncodeToVecError {
    #[snafu(display(
        "Specified image dimensions don't match the number of pixels: image is {width}x{height}, but {pixel_count} pixels were given"
    ))]
    InvalidDimensions {
        width: u32,
        height: u32,
        pixel_count: usize,
    },
}

impl QoiEncodeContext {
    /// Appends a complete QOI image (header, ops, end marker) to `w`.
    pub fn encode_to_vec(
        width: u32,
        height: u32,
        pixels: &[Rgba],
        w: &mut Vec<u8>,
    ) -> Result<(), EncodeToVecError> {
        ensure!(
            dimensions_match(width, height, pixels.len()),
            InvalidDimensionsSnafu {
                width,
                height,
                pixel_count: pixels.len()
            }
        );

        let start = w.len();
        w.extend_from_slice(&Header::new(width, height).to_bytes());

        let mut ctx = QoiEncodeContext::new();
        let written = ctx.encode_pixels_with(pixels, |bytes| {
            w.extend_from_slice(bytes);
            Ok::<_, Infallible>(())
        });
        if let Err(never) = written {
            match never {}
        }

        log::debug!(
            "encoded {width}x{height} image into {} bytes",
            w.len() - start
        );

        Ok(())
    }
}
