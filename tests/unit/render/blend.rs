use super::*;

fn close(a: Rgba8, b: Rgba8, tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn half_alpha_over_opaque_is_an_even_mix() {
    let base = [200, 40, 0, 255];
    let color = [0, 240, 100, 128];
    let out = over(base, color);
    assert!(close(out, [100, 140, 50, 255], 1), "{out:?}");
}

#[test]
fn translucent_over_translucent_accumulates_alpha() {
    // 0.5 over 0.5 -> 0.75 alpha; colors weighted 2:1 toward the source.
    let out = over([0, 0, 255, 128], [255, 0, 0, 128]);
    assert!(close(out, [170, 0, 85, 192], 1), "{out:?}");
}

#[test]
fn row_blend_checks_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_row_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(over_row_in_place(&mut dst[..6], &[0u8; 6]).is_err());

    over_row_in_place(&mut dst, &[1, 2, 3, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255, 0, 0, 0, 0]);
}
