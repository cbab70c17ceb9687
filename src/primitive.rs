//! Built-in primitive polynomials, one per supported field degree.
//!
//! Each polynomial is given as its non-trivial taps; `p[0]` and `p[m]` are
//! always 1 and are not listed separately.

/// Return the built-in primitive polynomial of degree `m`, as coefficients
/// `p[0..=m]` with `p[i] = 1` iff x^i appears in the polynomial.
///
/// `m` must be in `3..=16`; callers (`crate::codec`) are expected to have
/// already validated that range.
pub fn default_primitive(m: u32) -> Vec<u8> {
    let taps: &[u32] = match m {
        3 | 4 | 6 | 7 | 9 | 15 => &[1],
        5 | 11 => &[2],
        10 => &[3],
        13 => &[1, 3, 4],
        8 => &[4, 5, 6],
        12 => &[3, 4, 7],
        14 => &[1, 11, 12],
        16 => &[2, 3, 5],
        _ => panic!("no built-in primitive polynomial for m = {}", m),
    };

    let mut p = vec![0u8; m as usize + 1];
    p[0] = 1;
    p[m as usize] = 1;
    for &i in taps {
        p[i as usize] = 1;
    }
    p
}
