//! Brute-force attack on single-byte XOR ciphers.

use std::path::Path;

use rayon::prelude::*;

use crate::bytes::repeating_xor;
use crate::error::CrackError;
use crate::files::read_lines;
use crate::score::score_english;

/// The best decryption found for a single-byte XOR ciphertext.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleByteCrack {
    pub key: u8,
    pub plaintext: String,
    pub score: f64,
}

/// Brute force all 256 one-byte keys against `ciphertext` and return the
/// candidate whose decryption scores most like English.
///
/// Deterministic: a candidate only replaces the incumbent with a strictly
/// higher score, and equal scores keep the lower key byte.
pub fn crack_single_byte_xor(ciphertext: &[u8]) -> SingleByteCrack {
    (0u16..=255)
        .into_par_iter()
        .map(|key| {
            let key = key as u8;
            let decrypted = repeating_xor(ciphertext, &[key]);
            let plaintext = String::from_utf8_lossy(&decrypted).to_string();
            let score = score_english(&plaintext);
            SingleByteCrack {
                key,
                plaintext,
                score,
            }
        })
        .reduce_with(|best, candidate| {
            if candidate.score > best.score
                || (candidate.score == best.score && candidate.key < best.key)
            {
                candidate
            } else {
                best
            }
        })
        .unwrap_or(SingleByteCrack {
            key: 0,
            plaintext: String::new(),
            score: 0.0,
        })
}

/// Scan a file of hex-encoded ciphertext lines for the one line that was
/// single-byte-XOR encrypted, returning its best decryption.
///
/// Lines that fail to decode are a caller bug and abort the scan; lines
/// that merely decrypt to nothing plausible are skipped.
pub fn find_xor_encrypted_line<P: AsRef<Path>>(path: P) -> Result<SingleByteCrack, CrackError> {
    let mut best: Option<SingleByteCrack> = None;
    for line in read_lines(path)? {
        let bytes = hex::decode(line?.trim())?;
        let candidate = crack_single_byte_xor(&bytes);
        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best.filter(|b| b.score > 0.0)
        .ok_or_else(|| CrackError::Inconclusive("no line decrypts to plausible English".into()))
}
