// src/rcon/mod.rs
pub mod client;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod pacing;

pub use client::RconClient;
pub use error::RconError;
