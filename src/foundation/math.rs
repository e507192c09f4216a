/// Straight-alpha channel value for a premultiplied `c`, rounded to nearest and saturated.
pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let a = u32::from(a);
    let v = (u32::from(c) * 255 + a / 2) / a;
    v.min(255) as u8
}

/// Convert premultiplied RGBA8 pixels to straight alpha in place.
pub(crate) fn unpremultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = unpremul_u8(px[0], a);
        px[1] = unpremul_u8(px[1], a);
        px[2] = unpremul_u8(px[2], a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
