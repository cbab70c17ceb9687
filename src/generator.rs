//! Cyclotomic coset enumeration and generator polynomial construction
//! (spec §4.3).

use itertools::Itertools;

use crate::error::Error;
use crate::gf::GaloisField;

/// All 2-cyclotomic cosets of Z/nZ, as the orbit `{r, 2r mod n, 4r mod n, ...}`
/// for the smallest representative not yet covered, starting from `r = 1`
/// (the coset `{0}` is never needed by a BCH root set and is skipped).
fn cyclotomic_cosets(n: usize) -> Vec<Vec<usize>> {
    let mut covered = vec![false; n];
    let mut cosets = Vec::new();
    for r in 1..n {
        if covered[r] {
            continue;
        }
        let mut coset = Vec::new();
        let mut x = r;
        loop {
            covered[x] = true;
            coset.push(x);
            x = (x * 2) % n;
            if x == r {
                break;
            }
        }
        cosets.push(coset);
    }
    cosets
}

/// Build the generator polynomial g(x) for design distance `d = 2t + 1`:
/// the union of cyclotomic cosets intersecting `{1, ..., 2t}`, expressed as
/// the product of `(x - alpha^beta)` over that root set, reduced to binary
/// coefficients. Returns the coefficients `g[0..n_rdncy)` (the leading
/// `x^n_rdncy` term is implicit and not stored), where `n_rdncy = deg(g)`.
pub fn build_generator(gf: &GaloisField, t: usize) -> Result<Vec<u8>, Error> {
    let n = gf.n;
    let cosets = cyclotomic_cosets(n);

    let mut covered = vec![false; n];
    let mut roots: Vec<usize> = Vec::new();
    for i in 1..=(2 * t) {
        if covered[i] {
            continue;
        }
        let coset = cosets
            .iter()
            .find(|c| c.contains(&i))
            .expect("every nonzero residue mod N belongs to some cyclotomic coset");
        for &x in coset {
            covered[x] = true;
        }
        roots.extend(coset.iter().copied());
    }
    let roots: Vec<usize> = roots.into_iter().unique().sorted().collect();

    if roots.len() >= n {
        return Err(Error::InvalidArgument(
            "no message bits remain: generator polynomial would cover the whole codeword".into(),
        ));
    }

    // g(x) = product of (x + alpha^beta) over the root set, kept as full
    // GF(2^m) field values (coefficient of x^i at index i) until the final
    // binary reduction below.
    let mut coefs: Vec<u32> = vec![gf.alpha_to[roots[0]], 1];
    for &beta in &roots[1..] {
        let alpha_beta = gf.alpha_to[beta];
        let mut next = vec![0u32; coefs.len() + 1];
        for i in 0..next.len() {
            let shifted = if i >= 1 { coefs.get(i - 1).copied().unwrap_or(0) } else { 0 };
            let scaled = gf.mul(coefs.get(i).copied().unwrap_or(0), alpha_beta);
            next[i] = shifted ^ scaled;
        }
        coefs = next;
    }

    // `coefs` holds the full monic polynomial (degree `roots.len()`, so
    // `roots.len() + 1` coefficients); the leading x^deg term is always 1
    // and implicit in the stored generator, per the data model's
    // `g[0..n_rdncy)` layout.
    let leading = coefs.pop();
    debug_assert_eq!(leading, Some(1), "product of minimal polynomials is monic");

    let mut g = Vec::with_capacity(coefs.len());
    for c in coefs {
        match c {
            0 => g.push(0u8),
            1 => g.push(1u8),
            other => {
                return Err(Error::Internal(format!(
                    "generator polynomial coefficient {} is not binary",
                    other
                )))
            }
        }
    }

    debug_assert_eq!(g[0], 1, "a product of minimal polynomials always has constant term 1");
    Ok(g)
}
