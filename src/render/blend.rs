use crate::foundation::error::{MergeError, MergeResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Source-over blend of straight-alpha `src` onto straight-alpha `dst`.
///
/// Computed in premultiplied fixed point and normalized back to straight alpha:
/// `a = sa + da(1 - sa)`, `c = (sc*sa + dc*da*(1 - sa)) / a`. A transparent source leaves
/// `dst` untouched and an opaque source replaces it exactly.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    // Alpha scaled by 255: sa*255 + da*(255 - sa).
    let dst_weight = da * (255 - sa);
    let out_a_255 = sa * 255 + dst_weight;
    if out_a_255 == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * dst_weight;
        out[i] = div_round(num, out_a_255);
    }
    out[3] = div_round(out_a_255, 255);
    out
}

/// Blend a row of `src` pixels over an equally sized row of `dst` pixels.
pub fn over_row_in_place(dst: &mut [u8], src: &[u8]) -> MergeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MergeError::validation(
            "over_row_in_place expects equal-length rgba8 rows",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn div_round(num: u32, den: u32) -> u8 {
    ((num + den / 2) / den).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
