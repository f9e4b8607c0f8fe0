// src/rcon/connection.rs
use std::fmt;
use std::time::Duration;
use futures_util::{ SinkExt, StreamExt };
use log::{ debug, warn };
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{ self, Message };
use tokio_tungstenite::{ connect_async, MaybeTlsStream, WebSocketStream };
use crate::rcon::error::RconError;

pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CLIENT_NAME: &str = "WebRcon";

// Upper bound on the closing handshake so a stuck peer can't hold the socket.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub client_name: String,
}

impl ConnectionParams {
    /// The server authenticates from the path segment, so the password is part of the URL.
    pub fn url(&self) -> String {
        format!("ws://{}:{}/{}", self.host, self.port, self.password)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .field("client_name", &self.client_name)
            .finish()
    }
}

/// A single-use RCON socket: one command, one reply, then `close`.
pub struct Connection {
    endpoint: String,
    stream: Option<WsStream>,
}

impl Connection {
    pub async fn open(params: &ConnectionParams) -> Result<Self, RconError> {
        let endpoint = params.endpoint();
        debug!("Opening RCON connection to {}", endpoint);

        let (stream, _response) = connect_async(params.url()).await.map_err(|e| {
            RconError::Connection(format!("failed to connect to {}: {}", endpoint, e))
        })?;

        Ok(Self { endpoint, stream: Some(stream) })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self) -> Result<&mut WsStream, RconError> {
        self.stream.as_mut().ok_or_else(|| RconError::Connection("connection already closed".to_string()))
    }

    pub async fn send_command(&mut self, frame: &str) -> Result<(), RconError> {
        let endpoint = self.endpoint.clone();
        let stream = self.stream()?;
        stream.send(Message::Text(frame.to_string())).await?;
        debug!("Sent RCON frame to {} ({} bytes)", endpoint, frame.len());
        Ok(())
    }

    /// Waits for the next text frame. Control frames are skipped.
    pub async fn await_reply(&mut self, timeout: Duration) -> Result<String, RconError> {
        let stream = self.stream()?;

        let read = async {
            while let Some(next) = stream.next().await {
                match next {
                    Ok(Message::Text(text)) => return Ok(text),
                    Ok(Message::Binary(bytes)) => {
                        return String::from_utf8(bytes).map_err(|e| RconError::Decode(e.to_string()));
                    }
                    Ok(Message::Close(_)) => return Err(RconError::ClosedBeforeResponse),
                    Ok(_) => continue,
                    Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                        return Err(RconError::ClosedBeforeResponse);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(RconError::ClosedBeforeResponse)
        };

        match tokio::time::timeout(timeout, read).await {
            Ok(result) => result,
            Err(_) => Err(RconError::Timeout(timeout)),
        }
    }

    pub async fn round_trip(&mut self, frame: &str, timeout: Duration) -> Result<String, RconError> {
        self.send_command(frame).await?;
        let reply = self.await_reply(timeout).await?;
        debug!("Received RCON reply from {} ({} bytes)", self.endpoint, reply.len());
        Ok(reply)
    }

    /// Releases the socket. Calling it again is a no-op.
    pub async fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };

        match tokio::time::timeout(CLOSE_TIMEOUT, stream.close(None)).await {
            Ok(Ok(())) => debug!("Closed RCON connection to {}", self.endpoint),
            Ok(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)) => {}
            Ok(Err(e)) => debug!("Error closing RCON connection to {}: {}", self.endpoint, e),
            Err(_) => warn!("Timed out closing RCON connection to {}", self.endpoint),
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("RCON connection to {} dropped without close", self.endpoint);
        }
    }
}
