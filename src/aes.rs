//! AES-128 ECB and CBC glue over the `aes` crate's block primitive. The
//! cipher itself is an external collaborator; these helpers only handle
//! padding and block chaining.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::pkcs7::{pkcs7_pad, pkcs7_unpad};

pub const BLOCK_SIZE: usize = 16;

pub fn encrypt_aes_128_ecb(message: &[u8], key: &[u8; BLOCK_SIZE]) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let padded = pkcs7_pad(message, BLOCK_SIZE as u8);
    let mut ciphertext = Vec::with_capacity(padded.len());
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = GenericArray::clone_from_slice(chunk);
        cipher.encrypt_block(&mut block);
        ciphertext.extend_from_slice(&block);
    }
    ciphertext
}

pub fn decrypt_aes_128_ecb(ciphertext: &[u8], key: &[u8; BLOCK_SIZE]) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block = GenericArray::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        plaintext.extend_from_slice(&block);
    }
    pkcs7_unpad(&mut plaintext);
    plaintext
}

pub fn encrypt_aes_128_cbc(
    plaintext: &[u8],
    key: &[u8; BLOCK_SIZE],
    iv: &[u8; BLOCK_SIZE],
) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let padded = pkcs7_pad(plaintext, BLOCK_SIZE as u8);
    let mut ciphertext = Vec::with_capacity(padded.len());
    let mut last_block = GenericArray::clone_from_slice(iv);
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = GenericArray::clone_from_slice(chunk);
        block
            .iter_mut()
            .zip(last_block.iter())
            .for_each(|(b, prev)| *b ^= prev);
        cipher.encrypt_block(&mut block);
        ciphertext.extend_from_slice(&block);
        last_block = block;
    }
    ciphertext
}

pub fn decrypt_aes_128_cbc(
    ciphertext: &[u8],
    key: &[u8; BLOCK_SIZE],
    iv: &[u8; BLOCK_SIZE],
) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut last_block = GenericArray::from(*iv);
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block = GenericArray::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        block
            .iter_mut()
            .zip(last_block.iter())
            .for_each(|(b, prev)| *b ^= prev);
        plaintext.extend_from_slice(&block);
        last_block = GenericArray::clone_from_slice(chunk);
    }
    pkcs7_unpad(&mut plaintext);
    plaintext
}
