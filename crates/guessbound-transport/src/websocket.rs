//! WebSocket listener and connection over `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use guessbound_protocol::ConnectionId;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::TransportError;

/// Counter for assigning unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// Listens for incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Bind)?;
        tracing::info!(addr, "websocket listener bound");
        Ok(Self { listener })
    }

    /// The local address the listener is bound to. Useful with port 0
    /// in tests.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts the next connection and completes the WebSocket handshake.
    pub async fn accept(&mut self) -> Result<WsConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(TransportError::Handshake)?;

        let id =
            ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted websocket connection");

        let (sink, stream) = ws.split();
        Ok(WsConnection {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

/// One live WebSocket connection.
///
/// Sink and stream halves are locked independently: `send_text` and
/// `recv_text` never contend, so a broadcast can go out while a read is
/// parked waiting for the client's next frame.
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WsConnection {
    /// The unique identifier assigned to this connection on accept.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Sends one text frame.
    pub async fn send_text(&self, text: &str) -> Result<(), TransportError> {
        self.sink
            .lock()
            .await
            .send(Message::text(text.to_owned()))
            .await
            .map_err(TransportError::Send)
    }

    /// Receives the next text frame.
    ///
    /// Ping/pong and binary frames are skipped (tungstenite answers pings
    /// on flush). Returns `Ok(None)` when the peer closed the connection.
    pub async fn recv_text(&self) -> Result<Option<String>, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/binary/frame
                Some(Err(e)) => return Err(TransportError::Recv(e)),
            }
        }
    }

    /// Sends a close frame to the peer.
    pub async fn close(&self) -> Result<(), TransportError> {
        self.sink
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(TransportError::Send)
    }
}
