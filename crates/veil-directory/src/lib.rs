#![forbid(unsafe_code)]

//! veil-directory: node directory for the veil overlay.
//!
//! Relays register their public keys here; originators read the full
//! registry to build circuits. The registry is in-memory and lives for
//! the session.

pub mod api;
pub mod config;
pub mod registry;
pub mod server;

pub use config::ServerConfig;
pub use registry::{NodeRegistry, RegistryError};
pub use server::DirectoryServer;
