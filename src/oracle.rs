//! Chosen-plaintext attacks against append-and-encrypt oracles.
//!
//! The byte-at-a-time attack only needs the one capability modelled by
//! [`EncryptionOracle`]: hand the oracle a prefix, get back the encryption
//! of `prefix || secret` under a key that never changes for the session.
//! That determinism is a precondition of the attack, not an implementation
//! detail.

use rand::Rng;

use crate::aes::{encrypt_aes_128_cbc, encrypt_aes_128_ecb, BLOCK_SIZE};
use crate::ecb::detect_ecb;
use crate::error::CrackError;
use crate::pkcs7::pkcs7_unpad;

const FILLER_BYTE: u8 = b'A';
// Block sizes past this are not worth scanning for; real block ciphers top
// out at 32 bytes.
const MAX_BLOCK_SIZE_SCAN: usize = 64;

/// The append-and-encrypt capability the oracle attacks require.
pub trait EncryptionOracle {
    /// Encrypt `prefix || secret-suffix` under the oracle's fixed key.
    fn encrypt(&self, prefix: &[u8]) -> Vec<u8>;
}

/// An AES-128-ECB oracle holding a session-fixed key and secret suffix.
pub struct EcbSuffixOracle {
    key: [u8; BLOCK_SIZE],
    suffix: Vec<u8>,
}

impl EcbSuffixOracle {
    pub fn new(key: [u8; BLOCK_SIZE], suffix: Vec<u8>) -> Self {
        Self { key, suffix }
    }
}

impl EncryptionOracle for EcbSuffixOracle {
    fn encrypt(&self, prefix: &[u8]) -> Vec<u8> {
        let message = [prefix, &self.suffix].concat();
        encrypt_aes_128_ecb(&message, &self.key)
    }
}

/// Generate a random session key.
pub fn random_key<const N: usize>() -> [u8; N] {
    let mut key = [0u8; N];
    rand::thread_rng().fill(&mut key[..]);
    key
}

/// Discover an oracle's block size from its ciphertext lengths.
///
/// Growing the filler one byte at a time leaves the ciphertext length flat
/// until the padding spills into a new block; the size of that jump is the
/// block size.
pub fn discover_block_size(oracle: &dyn EncryptionOracle) -> Result<usize, CrackError> {
    let initial_len = oracle.encrypt(&[]).len();
    for filler_len in 1..=MAX_BLOCK_SIZE_SCAN {
        let len = oracle.encrypt(&vec![FILLER_BYTE; filler_len]).len();
        if len > initial_len {
            return Ok(len - initial_len);
        }
    }
    Err(CrackError::Inconclusive(format!(
        "ciphertext length never grew within {MAX_BLOCK_SIZE_SCAN} filler bytes"
    )))
}

/// Recover an ECB oracle's secret suffix one byte at a time.
///
/// Discovers the block size, confirms the oracle really is ECB (the attack
/// is invalid against chaining modes), then walks the secret: for position
/// `i` a filler of `block_size - (i % block_size) - 1` bytes aligns the
/// unknown byte to the end of block `i / block_size`, and trying all 256
/// completions of `filler || recovered` against that target block
/// identifies it. Recovery stops at the first position with no matching
/// byte (the natural end of the secret, where the oracle's own padding
/// starts shifting) or after `max_secret_len` bytes. Trailing padding
/// picked up from the oracle is stripped from the result.
pub fn crack_ecb_oracle(
    oracle: &dyn EncryptionOracle,
    max_secret_len: usize,
) -> Result<Vec<u8>, CrackError> {
    let block_size = discover_block_size(oracle)?;
    log::debug!("discovered block size {block_size}");

    let probe = oracle.encrypt(&vec![FILLER_BYTE; 2 * block_size]);
    if detect_ecb(&probe, block_size).is_none() {
        return Err(CrackError::ModeMismatch);
    }

    // Padding makes this an upper bound on the suffix length.
    let suffix_bound = oracle.encrypt(&[]).len();
    let mut recovered = Vec::new();
    while recovered.len() < max_secret_len.min(suffix_bound) {
        match crack_next_byte(oracle, block_size, &recovered)? {
            Some(byte) => recovered.push(byte),
            None => break,
        }
    }
    log::debug!("recovered {} bytes from oracle", recovered.len());
    pkcs7_unpad(&mut recovered);
    Ok(recovered)
}

fn crack_next_byte(
    oracle: &dyn EncryptionOracle,
    block_size: usize,
    recovered: &[u8],
) -> Result<Option<u8>, CrackError> {
    let position = recovered.len();
    let block_number = position / block_size;
    let filler = vec![FILLER_BYTE; block_size - (position % block_size) - 1];
    let block_range = block_number * block_size..(block_number + 1) * block_size;

    let target = oracle.encrypt(&filler);
    let Some(target_block) = target.get(block_range.clone()) else {
        return Ok(None);
    };

    // The dictionary of single-byte completions: every candidate shares the
    // prefix `filler || recovered`, so under ECB exactly one should encrypt
    // to the target block. Zero matches is the end of the secret; several
    // matches break the attack's assumptions and are surfaced, not guessed
    // through.
    let mut matched = None;
    let mut match_count = 0;
    for candidate in 0..=255u8 {
        let message = [&filler, recovered, std::slice::from_ref(&candidate)].concat();
        let ciphertext = oracle.encrypt(&message);
        if ciphertext.get(block_range.clone()) == Some(target_block) {
            match_count += 1;
            matched.get_or_insert(candidate);
        }
    }
    match match_count {
        0 => Ok(None),
        1 => Ok(matched),
        count => Err(CrackError::AmbiguousByte { position, count }),
    }
}

/// Which mode a [`RandomModeOracle`] chose for its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Ecb,
    Cbc,
}

/// An oracle that encrypts attacker input under a randomly chosen mode,
/// with a random key and random 5-10 byte pre/suffixes, for exercising the
/// mode distinguisher.
pub struct RandomModeOracle {
    key: [u8; BLOCK_SIZE],
    iv: [u8; BLOCK_SIZE],
    mode: CipherMode,
    prepend: Vec<u8>,
    append: Vec<u8>,
}

impl RandomModeOracle {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let mode = if rng.gen_bool(0.5) {
            CipherMode::Ecb
        } else {
            CipherMode::Cbc
        };
        Self {
            key: random_key(),
            iv: random_key(),
            mode,
            prepend: random_filler(&mut rng),
            append: random_filler(&mut rng),
        }
    }

    /// The mode actually chosen, so tests can check the classifier.
    pub fn mode(&self) -> CipherMode {
        self.mode
    }
}

impl Default for RandomModeOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl EncryptionOracle for RandomModeOracle {
    fn encrypt(&self, prefix: &[u8]) -> Vec<u8> {
        let message = [&self.prepend, prefix, &self.append].concat();
        match self.mode {
            CipherMode::Ecb => encrypt_aes_128_ecb(&message, &self.key),
            CipherMode::Cbc => encrypt_aes_128_cbc(&message, &self.key, &self.iv),
        }
    }
}

fn random_filler(rng: &mut impl Rng) -> Vec<u8> {
    let len = rng.gen_range(5..=10);
    (0..len).map(|_| rng.gen()).collect()
}

/// Classify an oracle as ECB or CBC by feeding it enough identical bytes
/// to force two identical plaintext blocks whatever junk it prepends.
pub fn classify_mode(oracle: &dyn EncryptionOracle, block_size: usize) -> CipherMode {
    let probe = oracle.encrypt(&vec![FILLER_BYTE; 4 * block_size]);
    if detect_ecb(&probe, block_size).is_some() {
        CipherMode::Ecb
    } else {
        CipherMode::Cbc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    const UNKNOWN_STRING: &str = "Um9sbGluJyBpbiBteSA1LjAKV2l0aCBteSByYWctdG9wIGRvd24gc28gbXkg\
aGFpciBjYW4gYmxvdwpUaGUgZ2lybGllcyBvbiBzdGFuZGJ5IHdhdmluZyBq\
dXN0IHRvIHNheSBoaQpEaWQgeW91IHN0b3A/IE5vLCBJIGp1c3QgZHJvdmUg\
YnkK";

    // A CBC oracle with the suffix shape the cracker expects, for checking
    // that the mode guard fires.
    struct CbcSuffixOracle {
        key: [u8; BLOCK_SIZE],
        iv: [u8; BLOCK_SIZE],
        suffix: Vec<u8>,
    }

    impl EncryptionOracle for CbcSuffixOracle {
        fn encrypt(&self, prefix: &[u8]) -> Vec<u8> {
            let message = [prefix, &self.suffix].concat();
            encrypt_aes_128_cbc(&message, &self.key, &self.iv)
        }
    }

    // Pads like a block cipher but blanks every byte: lengths behave, yet
    // every candidate byte produces the same block.
    struct DegenerateOracle {
        suffix_len: usize,
    }

    impl EncryptionOracle for DegenerateOracle {
        fn encrypt(&self, prefix: &[u8]) -> Vec<u8> {
            let padded_len = (prefix.len() + self.suffix_len) / BLOCK_SIZE * BLOCK_SIZE + BLOCK_SIZE;
            vec![0; padded_len]
        }
    }

    #[test]
    fn discovers_the_block_size() {
        let oracle = EcbSuffixOracle::new(random_key(), b"some secret".to_vec());

        assert_eq!(discover_block_size(&oracle).unwrap(), BLOCK_SIZE);
    }

    #[test]
    fn recovers_the_secret_from_an_ecb_oracle() {
        let secret = STANDARD.decode(UNKNOWN_STRING).unwrap();
        let oracle = EcbSuffixOracle::new(random_key(), secret.clone());

        let recovered = crack_ecb_oracle(&oracle, 256).unwrap();

        assert_eq!(recovered, secret);
    }

    #[test]
    fn recovery_is_deterministic_for_a_fixed_oracle() {
        let oracle = EcbSuffixOracle::new(random_key(), b"attack at dawn, again".to_vec());

        let first = crack_ecb_oracle(&oracle, 256).unwrap();
        let second = crack_ecb_oracle(&oracle, 256).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn recovery_honours_the_length_cap() {
        let oracle = EcbSuffixOracle::new(random_key(), b"0123456789abcdef0123".to_vec());

        let recovered = crack_ecb_oracle(&oracle, 5).unwrap();

        assert_eq!(recovered, b"01234");
    }

    #[test]
    fn non_ecb_oracle_is_rejected() {
        let oracle = CbcSuffixOracle {
            key: random_key(),
            iv: random_key(),
            suffix: b"you cannot have this".to_vec(),
        };

        let result = crack_ecb_oracle(&oracle, 256);

        assert!(matches!(result, Err(CrackError::ModeMismatch)));
    }

    #[test]
    fn degenerate_oracle_reports_ambiguity_instead_of_guessing() {
        let oracle = DegenerateOracle { suffix_len: 10 };

        let result = crack_ecb_oracle(&oracle, 256);

        assert!(matches!(
            result,
            Err(CrackError::AmbiguousByte { position: 0, .. })
        ));
    }

    #[test]
    fn classifies_the_random_mode_oracle_correctly() {
        for _ in 0..10 {
            let oracle = RandomModeOracle::new();

            let classified = classify_mode(&oracle, BLOCK_SIZE);

            assert_eq!(classified, oracle.mode());
        }
    }
}
