// src/rcon/envelope.rs
use serde::{ Deserialize, Serialize };
use crate::rcon::error::RconError;

/// Identifier sent with every command. Only one command is ever in flight per
/// connection, so replies never need correlating.
pub const UNCORRELATED_IDENTIFIER: i32 = -1;

/// Outbound command frame.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest<'a> {
    #[serde(rename = "Identifier")]
    pub identifier: i32,
    #[serde(rename = "Message")]
    pub message: &'a str,
    #[serde(rename = "Name")]
    pub name: &'a str,
}

impl<'a> CommandRequest<'a> {
    pub fn new(command: &'a str, client_name: &'a str) -> Self {
        Self {
            identifier: UNCORRELATED_IDENTIFIER,
            message: command,
            name: client_name,
        }
    }

    pub fn to_frame(&self) -> Result<String, RconError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Inbound reply frame. Only `message_text` is required; the server fills the
/// rest inconsistently.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawReply {
    #[serde(rename = "Identifier", default)]
    pub identifier: i64,
    #[serde(rename = "Message")]
    pub message_text: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Stacktrace", default)]
    pub stack_trace: Option<String>,
}

pub fn decode_reply(raw_frame: &str) -> Result<RawReply, RconError> {
    Ok(serde_json::from_str(raw_frame)?)
}

/// Recovers the console text carried inside a reply frame.
pub fn decode_message(raw_frame: &str) -> Result<String, RconError> {
    decode_reply(raw_frame).map(|reply| reply.message_text)
}
