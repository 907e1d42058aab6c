use crate::{
    encode::{dimensions_match, QoiEncodeContext},
    Header, Rgba,
};
use snafu::{ensure, ResultExt, Snafu};
use std::io::{self, Write};

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display(
        "Specified image dimensions don't match the number of pixels: image is {width}x{height}, but {pixel_count} pixels were given"
    ))]
    InvalidDimensions {
        width: u32,
        height: u32,
        pixel_count: usize,
    },
    #[snafu(display("failed to write QOI stream: {source}"))]
    WriteIo { source: io::Error },
}

impl Header {
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }
}

impl QoiEncodeContext {
    /// Writes a complete QOI image (header, ops, end marker) to `w`.
    ///
    /// Every op is a separate small write, so `w` should be buffered. Nothing is rolled back if a
    /// write fails part way through.
    pub fn encode<W: Write>(
        width: u32,
        height: u32,
        pixels: &[Rgba],
        mut w: W,
    ) -> Result<(), EncodeError> {
        ensure!(
            dimensions_match(width, height, pixels.len()),
            InvalidDimensionsSnafu {
                width,
                height,
                pixel_count: pixels.len()
            }
        );

        Self::encode_header(width, height, &mut w)?;
        Self::encode_pixels(pixels, w)?;

        log::debug!("encoded {width}x{height} image");

        Ok(())
    }

    /// Writes the header the encoder always uses: 4 channels, sRGB.
    pub fn encode_header<W: Write>(width: u32, height: u32, w: W) -> Result<(), EncodeError> {
        Header::new(width, height).write_to(w).context(WriteIoSnafu)
    }

    /// Writes the ops for `pixels` followed by the end marker, starting from a fresh context.
    pub fn encode_pixels<W: Write>(pixels: &[Rgba], mut w: W) -> Result<(), EncodeError> {
        Self::new().encode_pixels_with(pixels, |bytes| w.write_all(bytes).context(WriteIoSnafu))
    }
}
