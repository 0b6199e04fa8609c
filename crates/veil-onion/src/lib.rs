#![forbid(unsafe_code)]

//! Circuit construction and onion layer codec for the veil overlay.
//!
//! A sender selects an ordered route of distinct relays, then wraps its
//! message in one encryption layer per hop, innermost first. Each relay
//! strips exactly one layer with [`peel_layer`] and forwards the
//! remainder; it never learns its position in the route or whether the
//! remainder is another layer or final plaintext.

pub mod layer;
pub mod route;

pub use layer::{
    build_onion, check_layer_constants, peel_layer, Hop, PeeledLayer, WRAPPED_KEY_TEXT_LEN,
};
pub use route::select_route;

use veil_crypto::CryptoError;

/// Number of digits in the fixed-width destination tag at the front of
/// every decrypted layer.
pub const DEST_TAG_WIDTH: usize = 10;

/// Default number of relays in a circuit.
pub const DEFAULT_CIRCUIT_HOPS: usize = 3;

pub type Result<T> = std::result::Result<T, OnionError>;

#[derive(Debug, thiserror::Error)]
pub enum OnionError {
    /// The payload is shorter than a well-formed layer can be.
    #[error("malformed layer: need at least {need} characters, got {got}")]
    MalformedLayer { need: usize, got: usize },
    /// The decrypted destination tag is not a zero-padded port number.
    #[error("bad destination tag: {0:?}")]
    BadDestinationTag(String),
    /// The directory snapshot cannot supply a full circuit.
    #[error("insufficient nodes: need {need}, have {have}")]
    InsufficientNodes { need: usize, have: usize },
    /// A relay appears more than once in one circuit.
    #[error("node {0} appears twice in the circuit")]
    DuplicateHop(u32),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
