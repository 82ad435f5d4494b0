//! Distinguishing ECB-encrypted ciphertexts by their repeated blocks.
//!
//! ECB encrypts identical plaintext blocks to identical ciphertext blocks
//! under a fixed key, so block-aligned repetition in the plaintext shows
//! through. Chaining modes mix each block with prior ciphertext and destroy
//! the signal.

use std::collections::HashMap;
use std::path::Path;

use crate::error::CrackError;
use crate::files::read_lines;

pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// A repeated ciphertext block betraying ECB encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcbEvidence {
    /// The block value that appeared more than once.
    pub block: Vec<u8>,
    /// How many times it appeared.
    pub occurrences: usize,
    /// Block indices (not byte offsets) of its first two appearances.
    pub first_index: usize,
    pub second_index: usize,
}

/// Scan `ciphertext` for repeated non-overlapping `block_size` blocks.
///
/// Returns evidence for the most-repeated block value, or `None` when every
/// block is distinct. Any trailing partial block is ignored.
pub fn detect_ecb(ciphertext: &[u8], block_size: usize) -> Option<EcbEvidence> {
    let mut positions: HashMap<&[u8], Vec<usize>> = HashMap::new();
    for (index, block) in ciphertext.chunks_exact(block_size).enumerate() {
        positions.entry(block).or_default().push(index);
    }

    positions
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        // Most occurrences wins; earliest first appearance breaks ties so
        // the evidence is deterministic.
        .max_by_key(|(_, indices)| (indices.len(), std::cmp::Reverse(indices[0])))
        .map(|(block, indices)| EcbEvidence {
            block: block.to_vec(),
            occurrences: indices.len(),
            first_index: indices[0],
            second_index: indices[1],
        })
}

/// Scan a file of hex-encoded ciphertext lines for the first line that
/// shows ECB block repetition. Returns the zero-based line number and the
/// evidence, or `None` when no line is detected.
pub fn find_ecb_encrypted_line<P: AsRef<Path>>(
    path: P,
    block_size: usize,
) -> Result<Option<(usize, EcbEvidence)>, CrackError> {
    for (line_number, line) in read_lines(path)?.enumerate() {
        let bytes = hex::decode(line?.trim())?;
        if let Some(evidence) = detect_ecb(&bytes, block_size) {
            return Ok(Some((line_number, evidence)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::aes::{encrypt_aes_128_cbc, encrypt_aes_128_ecb};

    #[test]
    fn repeated_blocks_are_detected() {
        let mut ciphertext = Vec::new();
        ciphertext.extend_from_slice(&[0xaa; 16]);
        ciphertext.extend_from_slice(&[0x11; 16]);
        ciphertext.extend_from_slice(&[0xaa; 16]);

        let evidence = detect_ecb(&ciphertext, DEFAULT_BLOCK_SIZE).unwrap();

        assert_eq!(evidence.block, vec![0xaa; 16]);
        assert_eq!(evidence.occurrences, 2);
        assert_eq!((evidence.first_index, evidence.second_index), (0, 2));
    }

    #[test]
    fn distinct_blocks_are_not_detected() {
        let ciphertext: Vec<u8> = (0..48).collect();

        assert_eq!(detect_ecb(&ciphertext, DEFAULT_BLOCK_SIZE), None);
    }

    #[test]
    fn fewer_than_two_blocks_is_never_evidence() {
        assert_eq!(detect_ecb(&[0u8; 16], DEFAULT_BLOCK_SIZE), None);
        assert_eq!(detect_ecb(&[], DEFAULT_BLOCK_SIZE), None);
    }

    #[test]
    fn ecb_encrypted_text_with_repetition_is_detected_and_cbc_is_not() {
        let key: &[u8; 16] = b"YELLOW SUBMARINE";
        let plaintext = [b'A'; 64];

        let ecb = encrypt_aes_128_ecb(&plaintext, key);
        let cbc = encrypt_aes_128_cbc(&plaintext, key, &[3; 16]);

        assert!(detect_ecb(&ecb, DEFAULT_BLOCK_SIZE).is_some());
        assert!(detect_ecb(&cbc, DEFAULT_BLOCK_SIZE).is_none());
    }

    #[test]
    fn finds_the_ecb_line_in_a_file() {
        let key: &[u8; 16] = b"YELLOW SUBMARINE";
        let plaintext = [b'A'; 64];
        let cbc_line = hex::encode(encrypt_aes_128_cbc(&plaintext, key, &[9; 16]));
        let ecb_line = hex::encode(encrypt_aes_128_ecb(&plaintext, key));
        let path = std::env::temp_dir().join("cipherbreak_ecb_line_scan.hex");
        std::fs::write(&path, format!("{cbc_line}\n{ecb_line}\n{cbc_line}\n")).unwrap();

        let found = find_ecb_encrypted_line(&path, DEFAULT_BLOCK_SIZE).unwrap();

        std::fs::remove_file(&path).unwrap();
        let (line_number, evidence) = found.unwrap();
        assert_eq!(line_number, 1);
        assert!(evidence.occurrences >= 2);
    }
}
