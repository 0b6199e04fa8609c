#![forbid(unsafe_code)]

//! Hybrid crypto primitives for the veil overlay and their canonical
//! base64 text encodings.
//!
//! Asymmetric encryption is an HPKE-style sealed box (ephemeral X25519 +
//! HKDF-SHA256 + ChaCha20Poly1305); symmetric encryption is
//! ChaCha20Poly1305 with a random nonce prepended to the ciphertext so
//! the output is self-contained. All functions are pure apart from key
//! and nonce generation.

pub mod keys;
pub mod sealed;
pub mod symmetric;

#[cfg(test)]
mod proptests;

pub use keys::{
    export_private_key, export_public_key, import_private_key, import_public_key, KeyPair,
};
pub use x25519_dalek::{PublicKey, StaticSecret};
pub use sealed::{open, seal, sealed_text_len, SEALED_OVERHEAD};
pub use symmetric::{
    export_symmetric_key, generate_symmetric_key, import_symmetric_key, symmetric_decrypt,
    symmetric_encrypt, NONCE_LEN, SYM_KEY_LEN, SYM_KEY_TEXT_LEN,
};

/// Error type for all crypto operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// A key or ciphertext text token is not a valid encoding.
    #[error("malformed key encoding: {0}")]
    KeyFormat(&'static str),
    /// Ciphertext was not produced for this key, or was corrupted.
    #[error("decryption failed")]
    Decryption,
    #[error("encryption failed")]
    Encryption,
}

pub(crate) fn b64_encode(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    STANDARD.encode(bytes)
}

pub(crate) fn b64_decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    STANDARD
        .decode(text)
        .map_err(|_| CryptoError::KeyFormat("invalid base64"))
}

/// Length of the standard (padded) base64 encoding of `n` bytes.
pub fn b64_encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}
