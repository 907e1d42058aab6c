use crate::{utils::apply_diff, Rgba};

// OP: 0b01
#[inline(always)]
pub(crate) const fn small_diff(prev: Rgba, byte: u8) -> Rgba {
    let (r_diff, g_diff, b_diff) = (
        ((byte >> 4) & 0b11) as i8 - 2,
        ((byte >> 2) & 0b11) as i8 - 2,
        (byte & 0b11) as i8 - 2,
    );

    apply_rgb_diff(prev, r_diff, g_diff, b_diff)
}

// OP: 0b10
#[inline(always)]
pub(crate) const fn luma_diff(prev: Rgba, byte: u8, rg_bg_diffs: u8) -> Rgba {
    let g_diff = (byte & 0b0011_1111) as i8 - 32;
    let (rg_diff, bg_diff) = (
        (rg_bg_diffs >> 4) as i8 - 8,
        (rg_bg_diffs & 0b1111) as i8 - 8,
    );
    let (r_diff, b_diff) = (rg_diff + g_diff, bg_diff + g_diff);

    apply_rgb_diff(prev, r_diff, g_diff, b_diff)
}

#[inline]
const fn apply_rgb_diff(prev: Rgba, r_diff: i8, g_diff: i8, b_diff: i8) -> Rgba {
    Rgba {
        r: apply_diff(prev.r, r_diff),
        g: apply_diff(prev.g, g_diff),
        b: apply_diff(prev.b, b_diff),
        a: prev.a,
    }
}
