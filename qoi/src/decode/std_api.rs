use crate::{
    decode::{DecodeError, ImageTooLargeSnafu, QoiDecodeContext, VecDecodeOutput},
    header::check_magic,
    utils::BigEndian,
    Channels, Colorspace, Header, Rgba,
};
use byteorder::ReadBytesExt;
use snafu::{OptionExt, Snafu};
use std::io::{self, BufRead, Read};

/// Upper bound on the pixels reserved up front when the stream length is unknown.
const READER_PREALLOC_PIXELS: usize = 1 << 20;

#[derive(Debug, Snafu)]
pub enum ReadError {
    #[snafu(display("{source}"))]
    Decode { source: DecodeError },
    #[snafu(display("failed to read QOI stream: {source}"))]
    ReadIo { source: io::Error },
}

impl From<DecodeError> for ReadError {
    fn from(source: DecodeError) -> Self {
        ReadError::Decode { source }
    }
}

impl ReadError {
    /// The decode error, if the stream itself (rather than the reader) was at fault.
    pub fn as_decode_error(&self) -> Option<&DecodeError> {
        match self {
            ReadError::Decode { source } => Some(source),
            ReadError::ReadIo { .. } => None,
        }
    }
}

/// A short read is a truncated stream; anything else is the reader's fault.
fn read_error(source: io::Error) -> ReadError {
    if source.kind() == io::ErrorKind::UnexpectedEof {
        DecodeError::UnexpectedEof.into()
    } else {
        ReadError::ReadIo { source }
    }
}

impl Header {
    /// Reads and validates the 14-byte header from `r`.
    pub fn read_from<R: Read>(mut r: R) -> Result<Self, ReadError> {
        let mut magic = [0; 4];
        r.read_exact(&mut magic).map_err(read_error)?;
        check_magic(magic)?;

        let width = r.read_u32::<BigEndian>().map_err(read_error)?;
        let height = r.read_u32::<BigEndian>().map_err(read_error)?;
        let channels = Channels::try_from(r.read_u8().map_err(read_error)?)?;
        let colorspace = Colorspace::try_from(r.read_u8().map_err(read_error)?)?;

        Ok(Self {
            width,
            height,
            channels,
            colorspace,
        })
    }
}

impl QoiDecodeContext {
    /// Decodes a QOI image from a buffered reader. Pixel ops are read one byte at a time, so wrap
    /// files and sockets in a [`std::io::BufReader`].
    ///
    /// Reading stops after the op of the last pixel; the end marker is left unread in `r`.
    pub fn decode_from_reader<R: BufRead>(mut r: R) -> Result<(Header, Vec<Rgba>), ReadError> {
        let header = Header::read_from(&mut r)?;

        let pixel_count = usize::try_from(header.pixel_count())
            .ok()
            .context(ImageTooLargeSnafu {
                width: header.width,
                height: header.height,
            })?;

        let mut pixels = Vec::with_capacity(pixel_count.min(READER_PREALLOC_PIXELS));
        let next = || r.read_u8().map_err(read_error);
        Self::new().decode_pixels(pixel_count, next, &mut VecDecodeOutput::new(&mut pixels))?;

        log::debug!(
            "decoded {}x{} image from reader ({:?}, {:?})",
            header.width,
            header.height,
            header.channels,
            header.colorspace
        );

        Ok((header, pixels))
    }
}
