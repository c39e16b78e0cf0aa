//! Presence socket transport - tokio-tungstenite WebSocket
//!
//! The manager only sees [`Transport`] and [`Connector`], so the lifecycle can
//! be driven by scripted transports in tests.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Closed with code {code}: {reason}")]
    AbnormalClose { code: u16, reason: String },

    #[error("Connection dropped without close frame")]
    Dropped,
}

/// One open persistent connection
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Next text frame. `Ok(None)` is a clean close; any `Err` is an unclean one.
    async fn recv(&mut self) -> Result<Option<String>, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Opens transports; called once per connection attempt
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError>;
}

/// WebSocket connector used outside tests
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        // Both TLS users (tungstenite, reqwest) need a process-wide provider.
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, TransportError> {
        let (ws, _) = connect_async(url).await.map_err(|e| TransportError::Connect(e.to_string()))?;
        tracing::debug!("Socket open: {}", url);
        Ok(Box::new(WsTransport { ws }))
    }
}

pub struct WsTransport {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.ws
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::Socket(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => return Ok(Some(text)),
                    Err(_) => tracing::debug!("Skipping non-UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => return close_outcome(frame),
                // ping/pong are answered by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))) | None => {
                    return Err(TransportError::Dropped)
                }
                Some(Err(e)) => return Err(TransportError::Socket(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let frame = CloseFrame { code: CloseCode::Normal, reason: "teardown".into() };
        self.ws
            .close(Some(frame))
            .await
            .map_err(|e| TransportError::Socket(e.to_string()))
    }
}

fn close_outcome(frame: Option<CloseFrame<'_>>) -> Result<Option<String>, TransportError> {
    match frame {
        Some(f) if f.code == CloseCode::Normal => Ok(None),
        Some(f) => Err(TransportError::AbnormalClose { code: u16::from(f.code), reason: f.reason.to_string() }),
        None => Err(TransportError::AbnormalClose { code: 1005, reason: "no status".into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_close_is_clean() {
        let frame = CloseFrame { code: CloseCode::Normal, reason: "bye".into() };
        assert_eq!(close_outcome(Some(frame)), Ok(None));
    }

    #[test]
    fn other_closes_are_unclean() {
        let frame = CloseFrame { code: CloseCode::Away, reason: "restart".into() };
        assert_eq!(
            close_outcome(Some(frame)),
            Err(TransportError::AbnormalClose { code: 1001, reason: "restart".into() })
        );
        assert!(matches!(close_outcome(None), Err(TransportError::AbnormalClose { code: 1005, .. })));
    }
}
