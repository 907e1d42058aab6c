use crate::{
    consts::{QOI_HEADER_SIZE, QOI_MAGIC},
    decode::{
        DecodeError, InvalidChannelsSnafu, InvalidColorspaceSnafu, InvalidMagicSnafu,
        UnexpectedEofSnafu,
    },
    utils::{BigEndian, ByteOrder},
};
use snafu::ensure;

/// Number of channels declared by the header. Purely informative.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl TryFrom<u8> for Channels {
    type Error = DecodeError;

    fn try_from(channels: u8) -> Result<Self, Self::Error> {
        match channels {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            _ => InvalidChannelsSnafu { channels }.fail(),
        }
    }
}

/// Colorspace declared by the header. Purely informative.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    /// sRGB with linear alpha.
    Srgb = 0,
    /// All channels linear.
    Linear = 1,
}

impl TryFrom<u8> for Colorspace {
    type Error = DecodeError;

    fn try_from(colorspace: u8) -> Result<Self, Self::Error> {
        match colorspace {
            0 => Ok(Colorspace::Srgb),
            1 => Ok(Colorspace::Linear),
            _ => InvalidColorspaceSnafu { colorspace }.fail(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: Colorspace,
}

impl Header {
    /// The header the encoder writes: always 4 channels, sRGB.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: Channels::Rgba,
            colorspace: Colorspace::Srgb,
        }
    }

    #[inline]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Parses the header at the start of `data`, returning it with the rest of the stream.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        ensure!(data.len() >= QOI_MAGIC.len(), UnexpectedEofSnafu);
        check_magic([data[0], data[1], data[2], data[3]])?;

        ensure!(data.len() >= QOI_HEADER_SIZE, UnexpectedEofSnafu);
        let (header, data) = data.split_at(QOI_HEADER_SIZE);

        let header = Self {
            width: BigEndian::read_u32(&header[4..8]),
            height: BigEndian::read_u32(&header[8..12]),
            channels: Channels::try_from(header[12])?,
            colorspace: Colorspace::try_from(header[13])?,
        };

        Ok((header, data))
    }

    pub fn to_bytes(&self) -> [u8; QOI_HEADER_SIZE] {
        let mut bytes = [0; QOI_HEADER_SIZE];
        bytes[..4].copy_from_slice(&QOI_MAGIC);
        BigEndian::write_u32(&mut bytes[4..8], self.width);
        BigEndian::write_u32(&mut bytes[8..12], self.height);
        bytes[12] = self.channels as u8;
        bytes[13] = self.colorspace as u8;
        bytes
    }
}

pub(crate) fn check_magic(magic: [u8; 4]) -> Result<(), DecodeError> {
    ensure!(magic == QOI_MAGIC, InvalidMagicSnafu { magic });
    Ok(())
}
