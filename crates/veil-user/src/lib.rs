#![forbid(unsafe_code)]

//! veil-user: a user endpoint of the veil overlay.
//!
//! Receives delivered plaintext on `/message`, and originates messages
//! on `/sendMessage`: it reads the directory, picks a circuit, builds
//! the nested onion, and hands the outermost layer to the entry relay.
//! The sender observes only the handoff to the first hop.

pub mod api;
pub mod config;
pub mod originator;
pub mod server;
pub mod state;

pub use config::UserConfig;
pub use server::UserServer;
pub use state::RecordedState;
