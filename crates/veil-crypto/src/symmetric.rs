//! Symmetric AEAD for onion layer bodies.
//!
//! One fresh key per message layer, never reused. Encryption draws a
//! random nonce per call and prepends it to the ciphertext before
//! encoding, so the output token is self-contained.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand_core::OsRng;

use crate::{b64_decode, b64_encode, CryptoError};

/// Symmetric key size in bytes.
pub const SYM_KEY_LEN: usize = 32;
/// Length of an exported symmetric key in base64 text.
pub const SYM_KEY_TEXT_LEN: usize = 44;
/// AEAD nonce size in bytes.
pub const NONCE_LEN: usize = 12;

/// Generate a fresh symmetric key from the OS random source.
pub fn generate_symmetric_key() -> Key {
    ChaCha20Poly1305::generate_key(&mut OsRng)
}

/// Export a symmetric key to base64 text.
pub fn export_symmetric_key(key: &Key) -> String {
    b64_encode(key.as_slice())
}

/// Import a symmetric key from base64 text.
pub fn import_symmetric_key(text: &str) -> Result<Key, CryptoError> {
    let bytes = b64_decode(text)?;
    if bytes.len() != SYM_KEY_LEN {
        return Err(CryptoError::KeyFormat("symmetric key must be 32 bytes"));
    }
    Ok(*Key::from_slice(&bytes))
}

/// Encrypt `plaintext`, producing a base64 `nonce || ciphertext` token.
pub fn symmetric_encrypt(key: &Key, plaintext: &str) -> Result<String, CryptoError> {
    let mut nonce = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut nonce).map_err(|_| CryptoError::Encryption)?;
    let nonce = Nonce::from(nonce);

    let cipher = ChaCha20Poly1305::new(key);
    let ct = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Encryption)?;

    let mut out = Vec::with_capacity(NONCE_LEN + ct.len());
    out.extend_from_slice(nonce.as_slice());
    out.extend_from_slice(&ct);
    Ok(b64_encode(&out))
}

/// Decrypt a `nonce || ciphertext` token with a key in text form.
///
/// Fails with [`CryptoError::Decryption`] on tamper, corruption, or the
/// wrong key.
pub fn symmetric_decrypt(key_text: &str, ciphertext_text: &str) -> Result<String, CryptoError> {
    let key = import_symmetric_key(key_text)?;
    let bytes = b64_decode(ciphertext_text)?;
    if bytes.len() < NONCE_LEN + 16 {
        return Err(CryptoError::Decryption);
    }

    let (nonce, ct) = bytes.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(&key);
    let pt = cipher
        .decrypt(Nonce::from_slice(nonce), ct)
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(pt).map_err(|_| CryptoError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let key = generate_symmetric_key();
        let ct = symmetric_encrypt(&key, "hello overlay").unwrap();
        let pt = symmetric_decrypt(&export_symmetric_key(&key), &ct).unwrap();
        assert_eq!(pt, "hello overlay");
    }

    #[test]
    fn test_key_text_length() {
        let key = generate_symmetric_key();
        assert_eq!(export_symmetric_key(&key).len(), SYM_KEY_TEXT_LEN);
    }

    #[test]
    fn test_key_round_trip() {
        let key = generate_symmetric_key();
        let imported = import_symmetric_key(&export_symmetric_key(&key)).unwrap();
        assert_eq!(imported, key);
    }

    #[test]
    fn test_nonce_freshness() {
        // Identical plaintexts must yield different tokens on every call.
        let key = generate_symmetric_key();
        let a = symmetric_encrypt(&key, "same plaintext").unwrap();
        let b = symmetric_encrypt(&key, "same plaintext").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = generate_symmetric_key();
        let other = generate_symmetric_key();
        let ct = symmetric_encrypt(&key, "secret").unwrap();
        let err = symmetric_decrypt(&export_symmetric_key(&other), &ct).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption));
    }

    #[test]
    fn test_any_flipped_byte_fails() {
        let key = generate_symmetric_key();
        let key_text = export_symmetric_key(&key);
        let ct = symmetric_encrypt(&key, "tamper target").unwrap();
        let mut bytes = crate::b64_decode(&ct).unwrap();
        for i in 0..bytes.len() {
            bytes[i] ^= 0x80;
            let tampered = crate::b64_encode(&bytes);
            assert!(
                matches!(
                    symmetric_decrypt(&key_text, &tampered),
                    Err(CryptoError::Decryption)
                ),
                "flipping byte {} should fail decryption",
                i
            );
            bytes[i] ^= 0x80;
        }
    }

    #[test]
    fn test_truncated_token_fails() {
        let key = generate_symmetric_key();
        let short = crate::b64_encode(&[0u8; NONCE_LEN]);
        assert!(matches!(
            symmetric_decrypt(&export_symmetric_key(&key), &short),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn test_malformed_key_text() {
        let key = generate_symmetric_key();
        let ct = symmetric_encrypt(&key, "x").unwrap();
        assert!(matches!(
            symmetric_decrypt("@@@", &ct),
            Err(CryptoError::KeyFormat(_))
        ));
        let short_key = crate::b64_encode(&[0u8; 16]);
        assert!(matches!(
            symmetric_decrypt(&short_key, &ct),
            Err(CryptoError::KeyFormat(_))
        ));
    }
}
