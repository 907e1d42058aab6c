use crate::{utils::hash, Rgba};

/// The 64-slot table of recently seen pixels shared (implicitly) by encoder and decoder.
///
/// Slots are addressed by [`hash`]; storing a pixel overwrites whatever previously hashed to the
/// same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorArray([Rgba; 64]);

impl ColorArray {
    pub const fn new() -> Self {
        Self([Rgba::ZERO; 64])
    }

    /// Returns the pixel in `index`. Only the low 6 bits of `index` are used.
    #[inline]
    pub const fn lookup(&self, index: u8) -> Rgba {
        self.0[(index & 0b11_1111) as usize]
    }

    /// Stores `pixel` in its slot, returning the slot.
    #[inline]
    pub fn store(&mut self, pixel: Rgba) -> u8 {
        let index = hash(pixel);
        self.0[usize::from(index)] = pixel;
        index
    }
}

impl Default for ColorArray {
    fn default() -> Self {
        Self::new()
    }
}
