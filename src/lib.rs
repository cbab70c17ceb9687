//! Systematic binary BCH forward-error-correction over GF(2^m), 3 <= m <= 16.
//!
//! Construct a codec with [`Bch::new`] or [`Bch::with_primitive_poly`], then
//! encode with [`Bch::encode_bits`]/[`Bch::encode_bytes`] and decode with
//! [`Bch::decode_bits`]/[`Bch::decode_bytes`]. The bit-path functions are the
//! reference implementation; the byte-path functions are an 8-bit-table
//! accelerated fast path that is bit-exact with the reference on every
//! supported `(m, t, primitive polynomial)`.
//!
//! No CLI, wire format, or persisted state lives here — this crate is the
//! codec only; everything else (front-ends, bindings, benchmarking) is an
//! external collaborator.

mod bitops;
mod codec;
mod decoder;
mod encoder;
mod error;
mod generator;
mod gf;
mod primitive;
mod tables;

pub use codec::Bch;
pub use error::Error;
