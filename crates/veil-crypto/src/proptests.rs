#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::keys::KeyPair;
    use crate::sealed::{open, seal, sealed_text_len};
    use crate::symmetric::{
        export_symmetric_key, import_symmetric_key, symmetric_decrypt, symmetric_encrypt,
        SYM_KEY_LEN,
    };

    proptest! {
        #[test]
        fn test_symmetric_round_trip(plaintext in ".*") {
            let key = crate::symmetric::generate_symmetric_key();
            let ct = symmetric_encrypt(&key, &plaintext).unwrap();
            let pt = symmetric_decrypt(&export_symmetric_key(&key), &ct).unwrap();
            prop_assert_eq!(pt, plaintext);
        }

        #[test]
        fn test_sealed_round_trip(seed in any::<[u8; 32]>(), plaintext in ".*") {
            let secret = x25519_dalek::StaticSecret::from(seed);
            let public = x25519_dalek::PublicKey::from(&secret);
            let token = seal(&plaintext, &crate::keys::export_public_key(&public)).unwrap();
            let opened = open(&token, &secret).unwrap();
            prop_assert_eq!(opened, plaintext);
        }

        #[test]
        fn test_sealed_length_matches_derivation(len in 0usize..256) {
            // The encoded sealed-box length must match the derived
            // constant for every plaintext length, for any key.
            let pair = KeyPair::generate();
            let plaintext = "a".repeat(len);
            let token = seal(&plaintext, &pair.public_key_text()).unwrap();
            prop_assert_eq!(token.len(), sealed_text_len(len));
        }

        #[test]
        fn test_symmetric_key_text_round_trip(bytes in any::<[u8; SYM_KEY_LEN]>()) {
            let key = chacha20poly1305::Key::from(bytes);
            let text = export_symmetric_key(&key);
            let imported = import_symmetric_key(&text).unwrap();
            prop_assert_eq!(imported, key);
        }
    }
}
