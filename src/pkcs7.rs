/// Pad `bytes` to a multiple of `block_size` with PKCS#7 padding.
///
/// Always pads: input already at a block boundary gains a full block of
/// padding, so the padding is always removable.
pub fn pkcs7_pad(bytes: &[u8], block_size: u8) -> Vec<u8> {
    let n_pad = if bytes.len() % block_size as usize == 0 {
        block_size
    } else {
        block_size - (bytes.len() % block_size as usize) as u8
    };
    let mut out = Vec::with_capacity(bytes.len() + n_pad as usize);
    out.extend_from_slice(bytes);
    (0..n_pad).for_each(|_| out.push(n_pad));
    out
}

/// Strip a valid PKCS#7 padding run from the end of `bytes`, if present.
pub fn pkcs7_unpad(bytes: &mut Vec<u8>) {
    let Some(&last) = bytes.last() else {
        return;
    };
    let n_pad = last as usize;
    if n_pad == 0 || n_pad > bytes.len() {
        return;
    }
    if bytes[bytes.len() - n_pad..].iter().all(|&b| b == last) {
        bytes.truncate(bytes.len() - n_pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("YELL", 4, "YELL\x04\x04\x04\x04")]
    #[case("YELLOWS!!!", 6, "YELLOWS!!!\x02\x02")]
    #[case("YELLOW SUBMARINE", 20, "YELLOW SUBMARINE\x04\x04\x04\x04")]
    fn pad_pads_message(#[case] msg: &str, #[case] block_size: u8, #[case] expected: &str) {
        let padded = pkcs7_pad(msg.as_bytes(), block_size);

        assert_eq!(padded, expected.as_bytes());
    }

    #[test]
    fn pad_then_unpad_round_trips() {
        let mut padded = pkcs7_pad(b"YELLOW SUBMARINE", 16);
        assert_eq!(padded.len(), 32);

        pkcs7_unpad(&mut padded);

        assert_eq!(padded, b"YELLOW SUBMARINE");
    }

    #[test]
    fn unpad_leaves_invalid_padding_alone() {
        let mut bytes = b"ICE ICE BABY\x01\x02\x03\x04".to_vec();

        pkcs7_unpad(&mut bytes);

        assert_eq!(bytes, b"ICE ICE BABY\x01\x02\x03\x04");
    }

    #[test]
    fn unpad_of_empty_buffer_is_a_no_op() {
        let mut bytes = Vec::new();

        pkcs7_unpad(&mut bytes);

        assert!(bytes.is_empty());
    }
}
