use crate::consts::*;

/// One of the six operations a tag byte can start.
///
/// The payload carried by each variant is whatever part of the tag byte the operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Rgb,
    Rgba,
    /// Color array slot (0..63).
    Index(u8),
    /// The whole tag byte; the three 2-bit differences are packed in its low 6 bits.
    Diff(u8),
    /// The whole tag byte; the biased green difference is in its low 6 bits.
    Luma(u8),
    /// Number of repeats after the current one (0..61).
    Run(u8),
}

impl Op {
    /// Classifies a tag byte. The 8-bit tags are checked before the 2-bit tags they overlap with.
    #[inline]
    pub const fn from_tag(byte: u8) -> Self {
        match byte {
            QOI_OP_RGB => Op::Rgb,
            QOI_OP_RGBA => Op::Rgba,
            _ => match byte & QOI_MASK_2 {
                QOI_OP_INDEX => Op::Index(byte & !QOI_MASK_2),
                QOI_OP_DIFF => Op::Diff(byte),
                QOI_OP_LUMA => Op::Luma(byte),
                _ => Op::Run(byte & !QOI_MASK_2),
            },
        }
    }
}
