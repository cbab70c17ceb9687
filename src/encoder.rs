//! Systematic bit-path and byte-path encoders (spec §4.6).

use crate::bitops::{
    bits_to_words, get_bits, mask_width, shift_left8, words_for_bits, words_to_bits,
    words_to_ecc_bytes, xor_into,
};

/// Single LFSR clock: shift the parity register left by one position and
/// fold `input_bit` in through the feedback tap defined by `g`. Shared by
/// [`encode_bits`] (one call per message bit) and by
/// [`crate::tables::build_encode_lut`] (eight calls per byte value), so the
/// two stay bit-exact by construction.
pub fn lfsr_step(par: &mut [u8], g: &[u8], input_bit: u8) {
    let n_rdncy = par.len();
    let feedback = input_bit ^ par[n_rdncy - 1];
    for j in (1..n_rdncy).rev() {
        par[j] = par[j - 1] ^ (g[j] & feedback);
    }
    par[0] = g[0] & feedback;
}

/// Reference bit-path encoder (spec §4.6). `msg[i]` is message-bit `i` for
/// `i` in `[0, k)`; `n` is the codeword length N. Returns the length-`n`
/// codeword with parity first, message verbatim after.
///
/// Callers (`codec::Bch`) validate `msg.len() == n - g.len()` before this is
/// reached; this function trusts that invariant.
pub fn encode_bits(g: &[u8], n: usize, msg: &[u8]) -> Vec<u8> {
    let n_rdncy = g.len();
    let mut par = vec![0u8; n_rdncy];
    for i in (0..msg.len()).rev() {
        lfsr_step(&mut par, g, msg[i]);
    }

    let mut codeword = vec![0u8; n];
    codeword[..n_rdncy].copy_from_slice(&par);
    codeword[n_rdncy..].copy_from_slice(msg);
    codeword
}

/// Fast byte-path encoder (spec §4.6). `data` holds `ceil(k / 8)` bytes
/// packed per spec §3 (MSB-first big-endian, only the top `k` bits
/// meaningful); `ecc_out` receives `ceil(n_rdncy / 8)` parity bytes in the
/// LSB-first convention. `k` is the message bit count this codec expects;
/// callers size `data`/`ecc_out` and pass a matching `k` before this runs.
///
/// Processing `data` byte by byte, MSB first, reproduces [`encode_bits`]'s
/// `K-1` down to `0` processing order directly — the `stream_pos = k-1-i`
/// reversal in spec §3 is exactly what places message bit `K-1` at the
/// front of the byte stream.
///
/// When `n_rdncy < 8` the "top 8 bits of par" the table assumes do not
/// exist, so this falls back to driving [`lfsr_step`] once per message bit,
/// the same recurrence [`encode_bits`] uses, rather than approximating it.
pub fn encode_bytes(g: &[u8], encode_lut: &[Vec<u32>], k: usize, data: &[u8], ecc_out: &mut [u8]) {
    let n_rdncy = g.len();

    if n_rdncy < 8 {
        let mut par = vec![0u8; n_rdncy];
        for i in 0..k {
            let bit = (data[i / 8] >> (7 - i % 8)) & 1;
            lfsr_step(&mut par, g, bit);
        }
        ecc_out.copy_from_slice(&words_to_ecc_bytes(&bits_to_words(&par), n_rdncy));
        return;
    }

    let mut par = vec![0u32; words_for_bits(n_rdncy)];
    let full_bytes = k / 8;
    for &byte in &data[..full_bytes] {
        let top = get_bits(&par, n_rdncy - 8, 8) as u8;
        let feedback = top ^ byte;
        shift_left8(&mut par);
        mask_width(&mut par, n_rdncy);
        xor_into(&mut par, &encode_lut[feedback as usize]);
    }

    let rem = k % 8;
    if rem > 0 {
        let mut par_bits = words_to_bits(&par, n_rdncy);
        let tail = data[full_bytes];
        for bit_pos in 0..rem {
            let bit = (tail >> (7 - bit_pos)) & 1;
            lfsr_step(&mut par_bits, g, bit);
        }
        par = bits_to_words(&par_bits);
    }

    ecc_out.copy_from_slice(&words_to_ecc_bytes(&par, n_rdncy));
}
