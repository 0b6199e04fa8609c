#![forbid(unsafe_code)]

//! Shared wire types for the veil overlay's JSON HTTP protocol.
//!
//! Every cross-service payload is a single JSON object; field names are
//! camelCase on the wire.

pub mod v1;
