mod aes;
mod bytes;
mod ecb;
mod error;
mod files;
mod oracle;
mod pkcs7;
mod profile;
mod repeating_key;
mod score;
mod single_byte;

pub use aes::{
    decrypt_aes_128_cbc, decrypt_aes_128_ecb, encrypt_aes_128_cbc, encrypt_aes_128_ecb, BLOCK_SIZE,
};
pub use bytes::{hamming_distance, repeating_xor, xor_bytes};
pub use ecb::{detect_ecb, find_ecb_encrypted_line, EcbEvidence, DEFAULT_BLOCK_SIZE};
pub use error::CrackError;
pub use oracle::{
    classify_mode, crack_ecb_oracle, discover_block_size, random_key, CipherMode, EcbSuffixOracle,
    EncryptionOracle, RandomModeOracle,
};
pub use pkcs7::{pkcs7_pad, pkcs7_unpad};
pub use profile::{forge_admin_profile, parse_params, UserProfile, UserProfileOracle};
pub use repeating_key::{
    break_repeating_key_xor, find_key_sizes, KeySizeCandidate, RepeatingKeyCrack,
};
pub use score::score_english;
pub use single_byte::{crack_single_byte_xor, find_xor_encrypted_line, SingleByteCrack};
