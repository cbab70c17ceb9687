//! Error kinds surfaced by construction and encode/decode argument checks.
//!
//! Decode *failure* (an uncorrectable received word) is not an error — per
//! the propagation policy this engine follows, it is reported through the
//! ordinary return value of `decode_bits`/`decode_bytes` so high-throughput
//! callers never pay for unwinding on a routine bounded-distance failure.

use thiserror::Error as ThisError;

/// Failure modes of codec construction and of the encode/decode entry points.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A constructor or encode/decode argument violated its documented shape
    /// (bad `(n, t)` pair, malformed primitive polynomial, or a slice whose
    /// length doesn't match the codec's dimensions).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The received word is beyond the code's bounded-distance decoding
    /// radius. Produced internally by Berlekamp–Massey/Chien search; never
    /// returned from `Bch::decode_bits`/`Bch::decode_bytes` themselves,
    /// which report this case through their own return value instead.
    #[error("uncorrectable error pattern")]
    Uncorrectable,

    /// The generator polynomial construction produced a coefficient that is
    /// neither the GF(2^m) zero nor one. This can only happen if the field
    /// tables or coset enumeration are themselves wrong; it indicates a bug
    /// in this crate, not a caller mistake, and must never be masked.
    #[error("internal error: {0}")]
    Internal(String),
}
