// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the remote mutation service.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket connections for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use turf_core::{ClientMessage, ServerMessage};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport trait for the client/server message exchange.
///
/// Abstracts over the actual transport mechanism so the remote client can
/// be tested against mock implementations.
pub trait Transport: Send + Sync {
    /// Connect to a remote server.
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Disconnect from the server.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Send a message to the server.
    fn send(
        &mut self,
        msg: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;

    /// Receive a message from the server.
    ///
    /// Returns `None` if the connection is closed.
    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<ServerMessage>>> + Send + '_>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
///
/// The stream is dropped on any send or receive failure so the next call
/// reports [`TransportError::ConnectionClosed`] instead of operating on a
/// broken socket.
pub struct WebSocketTransport {
    stream: Option<WsStream>,
}

impl WebSocketTransport {
    /// Create a new, unconnected WebSocket transport.
    pub fn new() -> Self {
        WebSocketTransport { stream: None }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            let (stream, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            self.stream = Some(stream);
            Ok(())
        })
    }

    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            if let Some(mut stream) = self.stream.take() {
                let _ = stream.close(None).await;
            }
            Ok(())
        })
    }

    fn send(
        &mut self,
        msg: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(TransportError::ConnectionClosed)?;

            let json = msg
                .to_json()
                .map_err(|e| TransportError::SerializationError(e.to_string()))?;

            // SinkExt::send flushes, so a dead connection is detected here
            // rather than on a later call.
            if let Err(e) = stream.send(Message::Text(json.into())).await {
                self.stream = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<ServerMessage>>> + Send + '_>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let msg = ServerMessage::from_json(&text)
                            .map_err(|e| TransportError::SerializationError(e.to_string()))?;
                        return Ok(Some(msg));
                    }
                    Some(Ok(Message::Close(_))) => {
                        self.stream = None;
                        return Ok(None);
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and binary frames are not part of the
                        // protocol; keep waiting.
                        continue;
                    }
                    Some(Err(e)) => {
                        self.stream = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                    None => {
                        self.stream = None;
                        return Ok(None);
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
