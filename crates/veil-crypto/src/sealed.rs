//! Sealed-box asymmetric encryption.
//!
//! Seals a text plaintext to a recipient's X25519 public key: an
//! ephemeral Diffie-Hellman exchange, HKDF-SHA256 keyed on the ephemeral
//! public key, then ChaCha20Poly1305. The output is
//! `ephemeralPub(32) || aeadCiphertext`, base64-encoded, so for a fixed
//! plaintext length the encoded length is a constant — the invariant
//! relays rely on to split an onion layer.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::Hkdf;
use rand_core::OsRng;
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use crate::symmetric::NONCE_LEN;
use crate::{b64_decode, b64_encode, b64_encoded_len, import_public_key, CryptoError};

/// Bytes a sealed box adds on top of the plaintext: the ephemeral public
/// key plus the Poly1305 tag.
pub const SEALED_OVERHEAD: usize = 32 + 16;

/// Encoded length of a sealed box over `plaintext_len` bytes.
pub fn sealed_text_len(plaintext_len: usize) -> usize {
    b64_encoded_len(SEALED_OVERHEAD + plaintext_len)
}

fn kdf_key_nonce(shared_secret: &[u8; 32], salt: &[u8]) -> (Key, Nonce) {
    let hk = Hkdf::<Sha256>::new(Some(salt), shared_secret);

    let mut key = [0u8; 32];
    hk.expand(b"veil_seal_v1_key", &mut key).unwrap(); // Output size matches digest size, infallible

    let mut nonce = [0u8; NONCE_LEN];
    hk.expand(b"veil_seal_v1_nonce", &mut nonce)
        .unwrap(); // Output size < digest size, infallible

    (Key::from(key), Nonce::from(nonce))
}

/// Encrypt `plaintext` to the holder of `recipient_pub_text`.
pub fn seal(plaintext: &str, recipient_pub_text: &str) -> Result<String, CryptoError> {
    let recipient = import_public_key(recipient_pub_text)?;

    let eph = EphemeralSecret::random_from_rng(OsRng);
    let eph_pub = PublicKey::from(&eph);
    let shared = eph.diffie_hellman(&recipient);

    let (key, nonce) = kdf_key_nonce(shared.as_bytes(), eph_pub.as_bytes());
    let cipher = ChaCha20Poly1305::new(&key);
    let ct = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Encryption)?;

    let mut out = Vec::with_capacity(32 + ct.len());
    out.extend_from_slice(eph_pub.as_bytes());
    out.extend_from_slice(&ct);
    Ok(b64_encode(&out))
}

/// Decrypt a sealed box with the recipient's private key.
///
/// Fails with [`CryptoError::Decryption`] when the token was sealed to a
/// different key or has been corrupted.
pub fn open(ciphertext_text: &str, recipient_secret: &StaticSecret) -> Result<String, CryptoError> {
    let bytes = b64_decode(ciphertext_text)?;
    if bytes.len() < SEALED_OVERHEAD {
        return Err(CryptoError::Decryption);
    }

    let mut eph_pub_bytes = [0u8; 32];
    eph_pub_bytes.copy_from_slice(&bytes[..32]);
    let eph_pub = PublicKey::from(eph_pub_bytes);
    let shared = recipient_secret.diffie_hellman(&eph_pub);

    let (key, nonce) = kdf_key_nonce(shared.as_bytes(), &eph_pub_bytes);
    let cipher = ChaCha20Poly1305::new(&key);
    let pt = cipher
        .decrypt(&nonce, &bytes[32..])
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(pt).map_err(|_| CryptoError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    #[test]
    fn test_seal_open_round_trip() {
        let pair = KeyPair::generate();
        let sealed = seal("the quick brown fox", &pair.public_key_text()).unwrap();
        let opened = open(&sealed, pair.secret()).unwrap();
        assert_eq!(opened, "the quick brown fox");
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let sealed = seal("for alice only", &alice.public_key_text()).unwrap();
        let err = open(&sealed, bob.secret()).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption));
    }

    #[test]
    fn test_tampered_token_fails() {
        let pair = KeyPair::generate();
        let sealed = seal("payload", &pair.public_key_text()).unwrap();
        let mut bytes = crate::b64_decode(&sealed).unwrap();
        for i in 0..bytes.len() {
            bytes[i] ^= 0x01;
            let tampered = crate::b64_encode(&bytes);
            assert!(
                matches!(open(&tampered, pair.secret()), Err(CryptoError::Decryption)),
                "flipping byte {} should fail decryption",
                i
            );
            bytes[i] ^= 0x01;
        }
    }

    #[test]
    fn test_sealed_length_constant_across_keys() {
        let plaintext = "x".repeat(44);
        let expected = sealed_text_len(44);
        for _ in 0..8 {
            let pair = KeyPair::generate();
            let sealed = seal(&plaintext, &pair.public_key_text()).unwrap();
            assert_eq!(sealed.len(), expected);
        }
    }

    #[test]
    fn test_sealed_repeats_differ() {
        // Fresh ephemeral key per call: identical plaintexts must not
        // produce identical tokens.
        let pair = KeyPair::generate();
        let a = seal("same", &pair.public_key_text()).unwrap();
        let b = seal("same", &pair.public_key_text()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_truncated_token_fails() {
        let pair = KeyPair::generate();
        let short = crate::b64_encode(&[7u8; SEALED_OVERHEAD - 1]);
        assert!(matches!(
            open(&short, pair.secret()),
            Err(CryptoError::Decryption)
        ));
    }
}
