// src/rcon/error.rs
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RconError {
    #[error("RCON connection error: {0}")]
    Connection(String),

    #[error("RCON connection closed before response")]
    ClosedBeforeResponse,

    #[error("RCON command timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Invalid RCON reply: {0}")]
    Decode(String),
}

impl RconError {
    /// True for failures of the round trip itself, as opposed to an unusable reply.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RconError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Connection(e.to_string())
    }
}

impl From<serde_json::Error> for RconError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
