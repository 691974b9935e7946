//! WebSocket implementation of the session channel.
//!
//! One background task per channel owns the socket. Outbound frames reach it
//! through an unbounded queue; everything it observes is reported as a
//! `ChannelEvent` on the sender handed to `open`.

use futures::SinkExt;
use futures::stream::StreamExt;
use ragchat_core::channel::{Channel, ChannelEvent};
use ragchat_core::error::{RagchatError, Result};
use ragchat_core::protocol::OutboundMessage;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use url::Url;

/// Builds the channel address `{server_url}/ws/{session_id}`.
///
/// Only `ws` and `wss` URLs are accepted. A path already present on the
/// server URL is kept as a prefix.
pub fn endpoint_for_session(server_url: &str, session_id: &str) -> Result<Url> {
    let mut url = Url::parse(server_url)
        .map_err(|e| RagchatError::invalid_endpoint(server_url, e.to_string()))?;
    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(RagchatError::invalid_endpoint(
                server_url,
                format!("unsupported scheme '{}', expected ws or wss", other),
            ));
        }
    }
    if session_id.is_empty() {
        return Err(RagchatError::invalid_endpoint(server_url, "empty session id"));
    }

    let path = format!("{}/ws/{}", url.path().trim_end_matches('/'), session_id);
    url.set_path(&path);
    Ok(url)
}

enum Outgoing {
    Frame(String),
    Close,
}

/// A WebSocket connection owned by one session.
pub struct WebSocketChannel {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    closed: AtomicBool,
}

impl WebSocketChannel {
    /// Starts connecting to `endpoint` and returns immediately.
    ///
    /// Must be called from within a tokio runtime. The outcome of the
    /// handshake arrives on `events` as `Opened`, or as `Errored` followed
    /// by `Closed`.
    pub fn open(endpoint: Url, events: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        let (outgoing, queue) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(endpoint, queue, events));
        Self {
            outgoing,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Channel for WebSocketChannel {
    fn send(&self, message: &OutboundMessage) -> Result<()> {
        if self.is_closed() {
            return Err(RagchatError::channel("channel is closed"));
        }
        let frame = message.to_wire()?;
        self.outgoing
            .send(Outgoing::Frame(frame))
            .map_err(|_| RagchatError::channel("connection task has stopped"))
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        // The task may already be gone after a server-side close.
        let _ = self.outgoing.send(Outgoing::Close);
    }
}

async fn run_connection(
    endpoint: Url,
    mut queue: mpsc::UnboundedReceiver<Outgoing>,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
    tracing::info!("Initializing WebSocket connection to {}", endpoint);

    // Receivers may be dropped during teardown; events are best effort then.
    let emit = |event: ChannelEvent| {
        let _ = events.send(event);
    };

    let socket = match connect_async(endpoint.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            tracing::error!("WebSocket handshake with {} failed: {}", endpoint, e);
            emit(ChannelEvent::Errored(e.to_string()));
            emit(ChannelEvent::Closed);
            return;
        }
    };
    tracing::info!("Connected to {}", endpoint);
    emit(ChannelEvent::Opened);

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            outgoing = queue.recv() => match outgoing {
                Some(Outgoing::Frame(frame)) => {
                    tracing::debug!("Sending frame ({} bytes)", frame.len());
                    if let Err(e) = sink.send(WsMessage::Text(frame)).await {
                        tracing::warn!("WebSocket send failed: {}", e);
                        emit(ChannelEvent::Errored(e.to_string()));
                        break;
                    }
                }
                Some(Outgoing::Close) | None => {
                    tracing::debug!("Closing WebSocket on request");
                    if let Err(e) = sink.close().await {
                        tracing::debug!("Close handshake did not complete: {}", e);
                    }
                    break;
                }
            },
            incoming = stream.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    tracing::debug!("Received frame ({} bytes)", text.len());
                    emit(ChannelEvent::MessageReceived(text));
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    tracing::info!("Server closed the connection: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket receive failed: {}", e);
                    emit(ChannelEvent::Errored(e.to_string()));
                    break;
                }
                None => break,
            },
        }
    }

    tracing::info!("Disconnected from {}", endpoint);
    emit(ChannelEvent::Closed);
}
