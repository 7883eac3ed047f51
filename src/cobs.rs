//! Consistent Overhead Byte Stuffing.
//!
//! COBS removes every `0x00` byte from an arbitrary payload so the payload
//! can be framed on the wire with a single trailing `0x00` delimiter and
//! recovered by scanning for that delimiter, with no other framing
//! metadata. Each run of up to 254 non-zero bytes is preceded by a code
//! byte giving `run_length + 1`; a run that hits the 254 cap without a
//! zero emits code `0xFF` and starts a fresh run with no zero consumed.

use crate::error::Error;

/// Longest run of non-zero bytes a single COBS code byte can describe.
const MAX_RUN: usize = 254;

/// Largest possible encoded size for a message of `raw_len` bytes.
#[must_use]
pub const fn max_encoded_len(raw_len: usize) -> usize {
    let overhead = if raw_len == 0 {
        1
    } else {
        (raw_len + MAX_RUN - 1) / MAX_RUN
    };
    raw_len + overhead + 1
}

/// Encodes `input` into `output`, returning the number of bytes written.
///
/// `output` must be at least `max_encoded_len(input.len())` bytes; this is
/// checked with a `debug_assert!` rather than a runtime error, since callers
/// size their scratch buffers statically from `max_encoded_len` and a
/// violation is a programming bug, not a wire condition.
pub fn encode(input: &[u8], output: &mut [u8]) -> usize {
    debug_assert!(output.len() >= max_encoded_len(input.len()));

    let mut write_idx = 1usize;
    let mut code_idx = 0usize;
    let mut code: u8 = 1;

    for &byte in input {
        if byte == 0 {
            output[code_idx] = code;
            code = 1;
            code_idx = write_idx;
            write_idx += 1;
        } else {
            output[write_idx] = byte;
            write_idx += 1;
            code += 1;
            if code == 0xFF {
                output[code_idx] = code;
                code = 1;
                code_idx = write_idx;
                write_idx += 1;
            }
        }
    }
    output[code_idx] = code;
    write_idx
}

/// Decodes a COBS-encoded `input` (without its trailing `0x00` delimiter)
/// into `output`, returning the number of bytes written.
///
/// # Errors
///
/// Returns `Error::Invalid` for a zero code byte, a run that runs past the
/// end of `input`, or decoded output that doesn't fit in `output` — any of
/// which mean the frame was corrupted in transit.
pub fn decode(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let mut in_idx = 0usize;
    let mut out_idx = 0usize;

    while in_idx < input.len() {
        let code = input[in_idx];
        if code == 0 {
            return Err(Error::Invalid);
        }
        let run = code as usize - 1;
        in_idx += 1;

        if in_idx + run > input.len() || out_idx + run > output.len() {
            return Err(Error::Invalid);
        }
        output[out_idx..out_idx + run].copy_from_slice(&input[in_idx..in_idx + run]);
        out_idx += run;
        in_idx += run;

        if code != 0xFF && in_idx < input.len() {
            if out_idx >= output.len() {
                return Err(Error::Invalid);
            }
            output[out_idx] = 0;
            out_idx += 1;
        }
    }
    Ok(out_idx)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, max_encoded_len};

    #[rstest::rstest]
    #[case(&[], &[0x01])]
    #[case(&[0x00], &[0x01, 0x01])]
    #[case(&[0x11, 0x22, 0x00, 0x33], &[0x03, 0x11, 0x22, 0x02, 0x33])]
    #[case(&[0x11, 0x22, 0x33, 0x44], &[0x05, 0x11, 0x22, 0x33, 0x44])]
    #[case(&[0x00, 0x00], &[0x01, 0x01, 0x01])]
    fn encode_matches_known_vectors(#[case] input: &[u8], #[case] expected: &[u8]) {
        let mut out = [0u8; 16];
        let n = encode(input, &mut out);
        assert_eq!(&out[..n], expected);
    }

    #[test]
    fn never_emits_a_zero_except_as_framing() {
        let input: Vec<u8> = (0u16..600).map(|v| (v % 251) as u8).collect();
        let mut out = vec![0u8; max_encoded_len(input.len())];
        let n = encode(&input, &mut out);
        assert!(out[..n].iter().all(|&b| b != 0));
    }

    #[rstest::rstest]
    #[case(vec![])]
    #[case(vec![0x00])]
    #[case(vec![1, 2, 3, 0, 4, 5])]
    #[case((0..=255).map(|v| v as u8).collect())]
    #[case(vec![0xAB; 500])]
    fn round_trips_through_decode(#[case] input: Vec<u8>) {
        let mut encoded = vec![0u8; max_encoded_len(input.len())];
        let enc_len = encode(&input, &mut encoded);
        let mut decoded = vec![0u8; input.len().max(1)];
        let dec_len = decode(&encoded[..enc_len], &mut decoded).unwrap();
        assert_eq!(&decoded[..dec_len], &input[..]);
    }

    #[test]
    fn decode_rejects_embedded_zero_code() {
        let mut out = [0u8; 4];
        assert!(decode(&[0x02, 0x11, 0x00], &mut out).is_err());
    }
}
