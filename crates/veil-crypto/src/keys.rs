//! X25519 key pair management and text encodings.
//!
//! Each relay holds one key pair for its process lifetime. Keys travel
//! as base64 text: the public key to the directory, the private key
//! never (the debug endpoint for test harnesses excepted).

use rand_core::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{b64_decode, b64_encode, CryptoError};

/// An asymmetric key pair usable for sealed-box encrypt/decrypt.
///
/// Key material is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    #[zeroize(skip)] // StaticSecret zeroizes internally
    secret: StaticSecret,
    #[zeroize(skip)]
    public: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS random source.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Rebuild a key pair from an exported private key.
    pub fn from_private_key_text(text: &str) -> Result<Self, CryptoError> {
        let secret = import_private_key(text)?;
        let public = PublicKey::from(&secret);
        Ok(Self { secret, public })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn secret(&self) -> &StaticSecret {
        &self.secret
    }

    /// The public key in canonical text form.
    pub fn public_key_text(&self) -> String {
        export_public_key(&self.public)
    }

    /// The private key in canonical text form.
    pub fn private_key_text(&self) -> String {
        b64_encode(self.secret.as_bytes())
    }
}

/// Export a public key to base64 text.
pub fn export_public_key(key: &PublicKey) -> String {
    b64_encode(key.as_bytes())
}

/// Export a private key to base64 text. A missing key exports as `None`
/// rather than failing.
pub fn export_private_key(key: Option<&StaticSecret>) -> Option<String> {
    key.map(|k| b64_encode(k.as_bytes()))
}

/// Import a public key from base64 text.
pub fn import_public_key(text: &str) -> Result<PublicKey, CryptoError> {
    let bytes = key_bytes(text)?;
    Ok(PublicKey::from(bytes))
}

/// Import a private key from base64 text.
pub fn import_private_key(text: &str) -> Result<StaticSecret, CryptoError> {
    let bytes = key_bytes(text)?;
    Ok(StaticSecret::from(bytes))
}

fn key_bytes(text: &str) -> Result<[u8; 32], CryptoError> {
    let bytes = b64_decode(text)?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| CryptoError::KeyFormat("key must be 32 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_round_trip() {
        let pair = KeyPair::generate();
        let text = pair.public_key_text();
        let imported = import_public_key(&text).unwrap();
        assert_eq!(imported.as_bytes(), pair.public_key().as_bytes());
    }

    #[test]
    fn test_private_key_round_trip() {
        let pair = KeyPair::generate();
        let text = pair.private_key_text();
        let rebuilt = KeyPair::from_private_key_text(&text).unwrap();
        assert_eq!(rebuilt.public_key_text(), pair.public_key_text());
    }

    #[test]
    fn test_export_missing_private_key_is_none() {
        assert_eq!(export_private_key(None), None);
        let pair = KeyPair::generate();
        assert!(export_private_key(Some(pair.secret())).is_some());
    }

    #[test]
    fn test_import_rejects_bad_base64() {
        let err = import_public_key("not base64!!").unwrap_err();
        assert!(matches!(err, CryptoError::KeyFormat(_)));
    }

    #[test]
    fn test_import_rejects_wrong_length() {
        let short = crate::b64_encode(&[0u8; 16]);
        let err = import_private_key(&short).err().unwrap();
        assert!(matches!(err, CryptoError::KeyFormat(_)));
    }

    #[test]
    fn test_generated_pairs_differ() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.public_key_text(), b.public_key_text());
    }
}
