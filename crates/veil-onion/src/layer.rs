//! Onion layer construction and peeling.
//!
//! Wire format of one layer, as base64 text segments:
//!
//! ```text
//! wrappedKey (WRAPPED_KEY_TEXT_LEN chars) || encryptedBlob
//! ```
//!
//! `wrappedKey` is the layer's symmetric key in exported form, sealed to
//! the relay's public key. `encryptedBlob` decrypts to a 10-digit
//! zero-padded destination tag followed by the remainder: either the
//! next layer or, at the innermost layer, the final plaintext. The
//! wrapped-key segment has a constant encoded length because the sealed
//! plaintext is always the fixed-size exported key; every relay splits
//! on that constant.

use veil_crypto::{
    export_symmetric_key, generate_symmetric_key, open, seal, sealed_text_len, symmetric_decrypt,
    symmetric_encrypt, StaticSecret, SYM_KEY_TEXT_LEN,
};

use crate::{OnionError, Result, DEST_TAG_WIDTH};

/// Encoded length of the wrapped-key segment at the front of each layer.
///
/// Derived from the primitive sizes; [`check_layer_constants`] asserts
/// the derivation at startup so a key-size change cannot silently
/// corrupt layer parsing.
pub const WRAPPED_KEY_TEXT_LEN: usize = 124;

/// Verify that the wrapped-key constant matches the configured
/// primitive sizes.
pub fn check_layer_constants() -> Result<()> {
    let derived = sealed_text_len(SYM_KEY_TEXT_LEN);
    if derived != WRAPPED_KEY_TEXT_LEN {
        return Err(OnionError::MalformedLayer {
            need: WRAPPED_KEY_TEXT_LEN,
            got: derived,
        });
    }
    Ok(())
}

/// One relay hop as the sender sees it: where it listens and the key to
/// seal its layer to.
#[derive(Debug, Clone)]
pub struct Hop {
    pub node_id: u32,
    pub port: u16,
    pub pub_key: String,
}

/// Result of peeling one layer: where to forward, and the opaque
/// remainder to forward there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeeledLayer {
    pub next_hop: u16,
    pub remainder: String,
}

/// Build the nested onion for `route`, innermost layer first.
///
/// The innermost payload is `tag(destination_port) || message`; each
/// step outward encrypts the accumulated payload under a fresh symmetric
/// key, seals that key to the hop, and re-tags with the hop's own port
/// for the preceding relay. The returned text is the wire payload for
/// the first relay in `route`.
pub fn build_onion(route: &[Hop], destination_port: u16, message: &str) -> Result<String> {
    for (i, hop) in route.iter().enumerate() {
        if route[..i].iter().any(|h| h.node_id == hop.node_id) {
            return Err(OnionError::DuplicateHop(hop.node_id));
        }
    }

    let mut payload = message.to_string();
    let mut destination = destination_port;

    for hop in route.iter().rev() {
        let tagged = format!("{destination:0width$}{payload}", width = DEST_TAG_WIDTH);

        let sym_key = generate_symmetric_key();
        let blob = symmetric_encrypt(&sym_key, &tagged)?;
        let wrapped = seal(&export_symmetric_key(&sym_key), &hop.pub_key)?;

        payload = format!("{wrapped}{blob}");
        destination = hop.port;
    }

    Ok(payload)
}

/// Strip one layer from a wire payload with this relay's private key.
///
/// The relay neither knows nor cares whether the remainder is another
/// layer or final plaintext; there is no last-hop special case.
pub fn peel_layer(wire: &str, secret: &StaticSecret) -> Result<PeeledLayer> {
    if wire.len() < WRAPPED_KEY_TEXT_LEN {
        return Err(OnionError::MalformedLayer {
            need: WRAPPED_KEY_TEXT_LEN,
            got: wire.len(),
        });
    }
    let (wrapped, blob) = wire.split_at(WRAPPED_KEY_TEXT_LEN);

    let key_text = open(wrapped, secret)?;
    let payload = symmetric_decrypt(&key_text, blob)?;

    if payload.len() < DEST_TAG_WIDTH {
        return Err(OnionError::MalformedLayer {
            need: DEST_TAG_WIDTH,
            got: payload.len(),
        });
    }
    let tag_bytes = &payload.as_bytes()[..DEST_TAG_WIDTH];
    if !tag_bytes.iter().all(u8::is_ascii_digit) {
        return Err(OnionError::BadDestinationTag(
            String::from_utf8_lossy(tag_bytes).into_owned(),
        ));
    }

    let tag = &payload[..DEST_TAG_WIDTH];
    let next_hop = tag
        .parse::<u32>()
        .ok()
        .and_then(|p| u16::try_from(p).ok())
        .ok_or_else(|| OnionError::BadDestinationTag(tag.to_string()))?;

    Ok(PeeledLayer {
        next_hop,
        remainder: payload[DEST_TAG_WIDTH..].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_crypto::{CryptoError, KeyPair};

    fn make_hops(n: usize) -> (Vec<Hop>, Vec<KeyPair>) {
        let pairs: Vec<KeyPair> = (0..n).map(|_| KeyPair::generate()).collect();
        let hops = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| Hop {
                node_id: i as u32 + 1,
                port: 4001 + i as u16,
                pub_key: pair.public_key_text(),
            })
            .collect();
        (hops, pairs)
    }

    #[test]
    fn test_layer_constant_matches_primitives() {
        check_layer_constants().unwrap();
        assert_eq!(sealed_text_len(SYM_KEY_TEXT_LEN), WRAPPED_KEY_TEXT_LEN);
    }

    #[test]
    fn test_three_hop_circuit_recovers_message() {
        let (hops, pairs) = make_hops(3);
        let wire = build_onion(&hops, 3002, "hello").unwrap();

        let first = peel_layer(&wire, pairs[0].secret()).unwrap();
        assert_eq!(first.next_hop, hops[1].port);

        let second = peel_layer(&first.remainder, pairs[1].secret()).unwrap();
        assert_eq!(second.next_hop, hops[2].port);

        let third = peel_layer(&second.remainder, pairs[2].secret()).unwrap();
        assert_eq!(third.next_hop, 3002);
        assert_eq!(third.remainder, "hello");
    }

    #[test]
    fn test_two_hop_circuit_same_code_path() {
        // A relay's peel is position-agnostic; a shorter circuit goes
        // through the identical logic.
        let (hops, pairs) = make_hops(2);
        let wire = build_onion(&hops, 3001, "short path").unwrap();

        let first = peel_layer(&wire, pairs[0].secret()).unwrap();
        let second = peel_layer(&first.remainder, pairs[1].secret()).unwrap();
        assert_eq!(second.next_hop, 3001);
        assert_eq!(second.remainder, "short path");
    }

    #[test]
    fn test_wrong_relay_cannot_peel() {
        let (hops, pairs) = make_hops(3);
        let wire = build_onion(&hops, 3002, "hello").unwrap();
        // The second relay holds the wrong key for the outermost layer.
        let err = peel_layer(&wire, pairs[1].secret()).unwrap_err();
        assert!(matches!(err, OnionError::Crypto(CryptoError::Decryption)));
    }

    #[test]
    fn test_short_input_is_malformed() {
        let pair = KeyPair::generate();
        let err = peel_layer("too short", pair.secret()).unwrap_err();
        assert!(matches!(
            err,
            OnionError::MalformedLayer {
                need: WRAPPED_KEY_TEXT_LEN,
                got: 9
            }
        ));
    }

    #[test]
    fn test_tampered_blob_fails_decryption() {
        let (hops, pairs) = make_hops(2);
        let wire = build_onion(&hops, 3001, "integrity").unwrap();

        let mut chars: Vec<char> = wire.chars().collect();
        let i = WRAPPED_KEY_TEXT_LEN + 5;
        chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        let err = peel_layer(&tampered, pairs[0].secret()).unwrap_err();
        assert!(matches!(
            err,
            OnionError::Crypto(CryptoError::Decryption) | OnionError::Crypto(CryptoError::KeyFormat(_))
        ));
    }

    #[test]
    fn test_bad_destination_tag() {
        // Hand-build a layer whose decrypted payload starts with a
        // non-numeric tag.
        let pair = KeyPair::generate();
        let sym_key = generate_symmetric_key();
        let blob = symmetric_encrypt(&sym_key, "not-a-port12345").unwrap();
        let wrapped = seal(&export_symmetric_key(&sym_key), &pair.public_key_text()).unwrap();
        let wire = format!("{wrapped}{blob}");

        let err = peel_layer(&wire, pair.secret()).unwrap_err();
        assert!(matches!(err, OnionError::BadDestinationTag(_)));
    }

    #[test]
    fn test_tag_above_port_range_rejected() {
        let pair = KeyPair::generate();
        let sym_key = generate_symmetric_key();
        let blob = symmetric_encrypt(&sym_key, "0000099999rest").unwrap();
        let wrapped = seal(&export_symmetric_key(&sym_key), &pair.public_key_text()).unwrap();
        let wire = format!("{wrapped}{blob}");

        let err = peel_layer(&wire, pair.secret()).unwrap_err();
        assert!(matches!(err, OnionError::BadDestinationTag(_)));
    }

    #[test]
    fn test_payload_shorter_than_tag_is_malformed() {
        let pair = KeyPair::generate();
        let sym_key = generate_symmetric_key();
        let blob = symmetric_encrypt(&sym_key, "1234").unwrap();
        let wrapped = seal(&export_symmetric_key(&sym_key), &pair.public_key_text()).unwrap();
        let wire = format!("{wrapped}{blob}");

        let err = peel_layer(&wire, pair.secret()).unwrap_err();
        assert!(matches!(err, OnionError::MalformedLayer { .. }));
    }

    #[test]
    fn test_duplicate_hop_rejected() {
        let (mut hops, _pairs) = make_hops(3);
        hops[2].node_id = hops[0].node_id;
        let err = build_onion(&hops, 3002, "hello").unwrap_err();
        assert!(matches!(err, OnionError::DuplicateHop(1)));
    }

    #[test]
    fn test_outer_layer_length_stable_for_fixed_message() {
        // The wrapped-key segment is constant-length by construction;
        // two onions over the same route shape and message length have
        // identical wire lengths.
        let (hops_a, _) = make_hops(3);
        let (hops_b, _) = make_hops(3);
        let a = build_onion(&hops_a, 3002, "hello").unwrap();
        let b = build_onion(&hops_b, 3002, "hello").unwrap();
        assert_eq!(a.len(), b.len());
    }
}
