use crate::error::CrackError;

/// XOR two equal-length byte buffers.
pub fn xor_bytes(buf_a: &[u8], buf_b: &[u8]) -> Result<Vec<u8>, CrackError> {
    if buf_a.len() != buf_b.len() {
        return Err(CrackError::LengthMismatch {
            left: buf_a.len(),
            right: buf_b.len(),
        });
    }
    Ok(buf_a.iter().zip(buf_b.iter()).map(|(a, b)| a ^ b).collect())
}

/// Encrypt (or decrypt; the operation is an involution) a message with a
/// repeating-key XOR cipher.
pub fn repeating_xor(message: &[u8], key: &[u8]) -> Vec<u8> {
    message
        .iter()
        .zip(key.iter().cycle())
        .map(|(m, k)| m ^ k)
        .collect()
}

/// Count of differing bits between two equal-length byte buffers.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u32, CrackError> {
    if a.len() != b.len() {
        return Err(CrackError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(bit_distance(a, b))
}

// Length-unchecked variant for callers slicing equal blocks from one buffer.
pub(crate) fn bit_distance(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}
