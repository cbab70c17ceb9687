//! The `Bch` facade (spec §4.1): holds dimensions and tables, validates
//! constructor and call arguments, forwards to the other modules.

use crate::bitops::bytes_for_bits;
use crate::decoder;
use crate::encoder;
use crate::error::Error;
use crate::generator::build_generator;
use crate::gf::GaloisField;
use crate::primitive::default_primitive;
use crate::tables::{build_encode_lut, build_syndrome_lut};

/// A constructed systematic BCH codec over GF(2^m). Immutable after
/// construction; `encode_*`/`decode_*` take `&self` and allocate only their
/// own per-call buffers, so a single instance can be shared read-only across
/// concurrent callers (spec §5/§10).
pub struct Bch {
    gf: GaloisField,
    g: Vec<u8>,
    t: usize,
    encode_lut: Vec<Vec<u32>>,
    syndrome_lut: Vec<[u32; 256]>,
}

impl Bch {
    /// Construct a codec for codeword length `n = 2^m - 1` and correction
    /// capacity `t`, using the built-in primitive polynomial for the
    /// resolved `m`.
    pub fn new(n: usize, t: usize) -> Result<Self, Error> {
        let m = resolve_m(n)?;
        Self::build(m, n, t, &default_primitive(m))
    }

    /// Construct a codec using a caller-supplied primitive polynomial of
    /// degree `m` (length `m + 1`, `p[0] = p[m] = 1`).
    pub fn with_primitive_poly(n: usize, t: usize, p: &[u8]) -> Result<Self, Error> {
        let m = resolve_m(n)?;
        Self::build(m, n, t, p)
    }

    fn build(m: u32, n: usize, t: usize, p: &[u8]) -> Result<Self, Error> {
        if t < 1 {
            return Err(Error::InvalidArgument("t must be >= 1".into()));
        }
        if 2 * t >= n {
            return Err(Error::InvalidArgument("2t must be < N".into()));
        }

        let gf = GaloisField::new(m, p)?;
        let g = build_generator(&gf, t)?;
        let encode_lut = build_encode_lut(&g);
        let syndrome_lut = build_syndrome_lut(&gf, t);

        log::debug!(
            "Bch::new: m={} n={} t={} n_rdncy={} k={}",
            m,
            n,
            t,
            g.len(),
            n - g.len()
        );

        Ok(Bch { gf, g, t, encode_lut, syndrome_lut })
    }

    /// GF extension degree.
    pub fn m(&self) -> u32 {
        self.gf.m
    }

    /// Codeword length N in bits.
    pub fn n(&self) -> usize {
        self.gf.n
    }

    /// Correction capacity t.
    pub fn t(&self) -> usize {
        self.t
    }

    /// Parity bit count, `deg(g)`.
    pub fn n_rdncy(&self) -> usize {
        self.g.len()
    }

    /// Message bit count, `N - n_rdncy`.
    pub fn k(&self) -> usize {
        self.gf.n - self.g.len()
    }

    /// Parity byte count, `ceil(n_rdncy / 8)`.
    pub fn ecc_bytes(&self) -> usize {
        bytes_for_bits(self.g.len())
    }

    /// Reference bit-path encoder (spec §4.6). `msg.len()` must equal `k()`;
    /// returns a fresh length-`n()` codeword, parity bits first.
    pub fn encode_bits(&self, msg: &[u8]) -> Result<Vec<u8>, Error> {
        if msg.len() != self.k() {
            return Err(Error::InvalidArgument(format!(
                "message length {} does not match k = {}",
                msg.len(),
                self.k()
            )));
        }
        Ok(encoder::encode_bits(&self.g, self.gf.n, msg))
    }

    /// Fast byte-path encoder (spec §4.6). `data` must hold `ceil(k/8)`
    /// bytes packed per spec §3; `ecc_out` must hold `ecc_bytes()` bytes and
    /// receives the parity.
    pub fn encode_bytes(&self, data: &[u8], ecc_out: &mut [u8]) -> Result<(), Error> {
        let expected_data_len = bytes_for_bits(self.k());
        if data.len() != expected_data_len {
            return Err(Error::InvalidArgument(format!(
                "data length {} does not match ceil(k/8) = {}",
                data.len(),
                expected_data_len
            )));
        }
        if ecc_out.len() != self.ecc_bytes() {
            return Err(Error::InvalidArgument(format!(
                "ecc_out length {} does not match ecc_bytes = {}",
                ecc_out.len(),
                self.ecc_bytes()
            )));
        }
        encoder::encode_bytes(&self.g, &self.encode_lut, self.k(), data, ecc_out);
        Ok(())
    }

    /// Reference bit-path decoder (spec §4.7–§4.8). `received.len()` must
    /// equal `n()`; `out.len()` must equal `k()`. Returns `true` on success;
    /// on failure `out`'s contents are unspecified.
    pub fn decode_bits(&self, received: &[u8], out: &mut [u8]) -> Result<bool, Error> {
        if received.len() != self.gf.n {
            return Err(Error::InvalidArgument(format!(
                "received length {} does not match N = {}",
                received.len(),
                self.gf.n
            )));
        }
        if out.len() != self.k() {
            return Err(Error::InvalidArgument(format!(
                "out length {} does not match k = {}",
                out.len(),
                self.k()
            )));
        }
        Ok(decoder::decode_bits(&self.gf, self.t, received, out))
    }

    /// Fast byte-path decoder (spec §4.7–§4.8). Corrects `data`/`ecc` in
    /// place. Returns the number of corrected bits on success, or `-1` on
    /// an uncorrectable pattern (spec §4.1's non-raising failure report).
    pub fn decode_bytes(&self, data: &mut [u8], ecc: &mut [u8]) -> Result<i64, Error> {
        let expected_data_len = bytes_for_bits(self.k());
        if data.len() != expected_data_len {
            return Err(Error::InvalidArgument(format!(
                "data length {} does not match ceil(k/8) = {}",
                data.len(),
                expected_data_len
            )));
        }
        if ecc.len() != self.ecc_bytes() {
            return Err(Error::InvalidArgument(format!(
                "ecc length {} does not match ecc_bytes = {}",
                ecc.len(),
                self.ecc_bytes()
            )));
        }
        match decoder::decode_bytes(
            &self.gf,
            self.t,
            &self.g,
            &self.encode_lut,
            &self.syndrome_lut,
            self.k(),
            data,
            ecc,
        ) {
            Ok(count) => Ok(count as i64),
            Err(()) => {
                log::warn!("bch decode_bytes: uncorrectable error pattern");
                Ok(-1)
            }
        }
    }
}

fn resolve_m(n: usize) -> Result<u32, Error> {
    for m in 3..=16u32 {
        if n == (1usize << m) - 1 {
            return Ok(m);
        }
    }
    Err(Error::InvalidArgument(format!(
        "N = {} is not 2^m - 1 for any m in 3..=16",
        n
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_n_that_is_not_a_mersenne_number() {
        let err = Bch::new(20, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_t_zero() {
        let err = Bch::new(31, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_2t_at_or_above_n() {
        let err = Bch::new(31, 16).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn accessors_are_consistent() {
        let bch = Bch::new(31, 3).unwrap();
        assert_eq!(bch.m(), 5);
        assert_eq!(bch.n(), 31);
        assert_eq!(bch.t(), 3);
        assert_eq!(bch.k() + bch.n_rdncy(), bch.n());
        assert_eq!(bch.ecc_bytes(), (bch.n_rdncy() + 7) / 8);
    }

    #[test]
    fn encode_decode_roundtrip_clean_channel() {
        let bch = Bch::new(31, 3).unwrap();
        let msg: Vec<u8> = (0..bch.k()).map(|i| (i % 2) as u8).collect();
        let cw = bch.encode_bits(&msg).unwrap();

        let mut out = vec![0u8; bch.k()];
        assert!(bch.decode_bits(&cw, &mut out).unwrap());
        assert_eq!(out, msg);
    }

    #[test]
    fn encode_bits_rejects_wrong_message_length() {
        let bch = Bch::new(31, 3).unwrap();
        let err = bch.encode_bits(&vec![0u8; 5]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn decode_bytes_reports_negative_on_uncorrectable_pattern() {
        let bch = Bch::new(31, 3).unwrap();
        let msg = vec![1u8; bch.k()];
        let mut data = crate::bitops::pack_message_bits(&msg);
        let mut ecc = vec![0u8; bch.ecc_bytes()];
        bch.encode_bytes(&data, &mut ecc).unwrap();

        for i in 0..bch.k() {
            let (byte, shift) = (i / 8, 7 - (i % 8) as u8);
            data[byte] ^= 1 << shift;
        }
        let result = bch.decode_bytes(&mut data, &mut ecc).unwrap();
        assert_eq!(result, -1);
    }
}
