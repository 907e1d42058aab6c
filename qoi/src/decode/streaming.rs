use crate::{
    color_array::ColorArray,
    decode::{
        ops::{luma_diff, small_diff},
        DecodeError, DecodeOutput, UnexpectedEofSnafu,
    },
    op::Op,
    Header, Rgba,
};
use snafu::ensure;

/// Decodes the op stream of a QOI image (without the header) from input arriving in arbitrary
/// chunks.
#[derive(Debug, Clone, Copy)]
pub struct QoiStreamingDecodeContext {
    state: QoiStreamingDecodeState,
    prev: Rgba,
    run: u8,
    arr: ColorArray,
    remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QoiStreamingDecodeState {
    Default,
    /// Collecting the payload of QOI_OP_RGB (`len == 3`, alpha pre-filled) or QOI_OP_RGBA.
    Raw { buf: [u8; 4], filled: u8, len: u8 },
    LumaByte2(u8),
}

impl QoiStreamingDecodeContext {
    pub const fn new(pixel_count: u64) -> Self {
        Self {
            state: QoiStreamingDecodeState::Default,
            prev: Rgba::SEED,
            run: 0,
            arr: ColorArray::new(),
            remaining: pixel_count,
        }
    }

    pub const fn from_header(header: &Header) -> Self {
        Self::new(header.pixel_count())
    }

    #[inline]
    pub const fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Decodes as much of `input` as possible into `output`.
    ///
    /// Returns the number of input bytes consumed. Fewer than `input.len()` bytes are consumed
    /// once the last pixel has been produced (the end marker is left alone) or once `output` is
    /// full; feed the remainder again after making room. Ops split across calls are resumed where
    /// they left off.
    pub fn feed(&mut self, input: &[u8], output: &mut impl DecodeOutput) -> usize {
        let mut input_idx = 0;

        while self.remaining > 0 {
            if matches!(output.max_len(), Some(max) if output.current_output_position() >= max) {
                break;
            }

            if self.run > 0 {
                self.run -= 1;
                self.emit(self.prev, output);
                continue;
            }

            let Some(&byte) = input.get(input_idx) else {
                break;
            };
            input_idx += 1;

            let pixel = match self.state {
                QoiStreamingDecodeState::Default => match Op::from_tag(byte) {
                    Op::Rgb => {
                        self.state = QoiStreamingDecodeState::Raw {
                            buf: [0, 0, 0, self.prev.a],
                            filled: 0,
                            len: 3,
                        };
                        continue;
                    }
                    Op::Rgba => {
                        self.state = QoiStreamingDecodeState::Raw {
                            buf: [0; 4],
                            filled: 0,
                            len: 4,
                        };
                        continue;
                    }
                    Op::Index(index) => {
                        self.emit(self.arr.lookup(index), output);
                        continue;
                    }
                    Op::Diff(byte) => small_diff(self.prev, byte),
                    Op::Luma(byte) => {
                        self.state = QoiStreamingDecodeState::LumaByte2(byte);
                        continue;
                    }
                    Op::Run(run) => {
                        self.run = run;
                        self.emit(self.prev, output);
                        continue;
                    }
                },
                QoiStreamingDecodeState::Raw {
                    mut buf,
                    filled,
                    len,
                } => {
                    buf[usize::from(filled)] = byte;
                    let filled = filled + 1;
                    if filled < len {
                        self.state = QoiStreamingDecodeState::Raw { buf, filled, len };
                        continue;
                    }
                    Rgba::from(buf)
                }
                QoiStreamingDecodeState::LumaByte2(byte1) => luma_diff(self.prev, byte1, byte),
            };

            self.state = QoiStreamingDecodeState::Default;
            self.arr.store(pixel);
            self.emit(pixel, output);
        }

        input_idx
    }

    /// Fails if the stream ended while pixels were still owed.
    pub fn finish(self) -> Result<(), DecodeError> {
        ensure!(self.remaining == 0, UnexpectedEofSnafu);
        Ok(())
    }

    #[inline(always)]
    fn emit(&mut self, pixel: Rgba, output: &mut impl DecodeOutput) {
        self.prev = pixel;
        self.remaining -= 1;
        output.write_pixel(pixel);
    }
}
