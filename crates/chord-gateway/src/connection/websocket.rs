//! WebSocket transport
//!
//! `tokio-tungstenite` client split into a reader task and a writer task. The writer
//! is fed by an unbounded channel so `send` never blocks the caller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use super::transport::{Transport, TransportEvent, TransportSink};
use crate::error::{GatewayError, GatewayResult};

/// Close code reported when the socket drops without a close frame
const ABNORMAL_CLOSURE: u16 = 1006;

/// WebSocket transport
#[derive(Clone, Default)]
pub struct WsTransport {
    inner: Arc<WsInner>,
}

#[derive(Default)]
struct WsInner {
    /// Bumped on every open/close; events from older sockets are dropped
    generation: AtomicU64,
    open: AtomicBool,
    writer: Mutex<Option<mpsc::UnboundedSender<Message>>>,
}

impl WsInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Forget the current socket, returning its writer
    fn detach(&self) -> Option<mpsc::UnboundedSender<Message>> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        self.writer.lock().take()
    }
}

impl WsTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport")
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .field("open", &self.inner.open.load(Ordering::SeqCst))
            .finish()
    }
}

impl Transport for WsTransport {
    fn open(&self, url: &str, sink: TransportSink) -> GatewayResult<()> {
        let runtime = Handle::try_current().map_err(|e| GatewayError::Transport(e.to_string()))?;

        if let Some(previous) = self.inner.detach() {
            let _ = previous.send(close_message(1000));
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = mpsc::unbounded_channel::<Message>();
        *self.inner.writer.lock() = Some(tx);

        let inner = self.inner.clone();
        let url = url.to_string();

        runtime.spawn(async move {
            run_socket(inner, generation, url, rx, sink).await;
        });

        Ok(())
    }

    fn send(&self, text: String) -> GatewayResult<()> {
        if !self.is_open() {
            return Err(GatewayError::NotOpen);
        }

        let writer = self.inner.writer.lock();
        let tx = writer.as_ref().ok_or(GatewayError::NotOpen)?;
        tx.send(Message::Text(text)).map_err(|_| GatewayError::NotOpen)
    }

    fn close(&self, code: u16) {
        if let Some(writer) = self.inner.detach() {
            tracing::debug!(close_code = code, "Closing WebSocket");
            let _ = writer.send(close_message(code));
        }
    }

    fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::SeqCst)
    }
}

fn close_message(code: u16) -> Message {
    Message::Close(Some(CloseFrame {
        code: WsCloseCode::from(code),
        reason: "".into(),
    }))
}

async fn run_socket(
    inner: Arc<WsInner>,
    generation: u64,
    url: String,
    mut outgoing: mpsc::UnboundedReceiver<Message>,
    sink: TransportSink,
) {
    let stream = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "WebSocket connect failed");
            if inner.is_current(generation) {
                inner.open.store(false, Ordering::SeqCst);
                inner.writer.lock().take();
                sink(TransportEvent::Error(e.to_string()));
                sink(TransportEvent::Close {
                    code: ABNORMAL_CLOSURE,
                    reason: e.to_string(),
                });
            }
            return;
        }
    };

    if !inner.is_current(generation) {
        return;
    }

    tracing::info!(url = %url, "WebSocket connection established");
    inner.open.store(true, Ordering::SeqCst);
    sink(TransportEvent::Open);

    let (mut ws_sink, mut ws_stream) = stream.split();

    let write_task = tokio::spawn(async move {
        while let Some(msg) = outgoing.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if ws_sink.send(msg).await.is_err() {
                tracing::warn!("Failed to write to WebSocket");
                break;
            }
            if closing {
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    let mut code = ABNORMAL_CLOSURE;
    let mut reason = String::new();

    while let Some(frame) = ws_stream.next().await {
        if !inner.is_current(generation) {
            break;
        }

        match frame {
            Ok(Message::Text(text)) => sink(TransportEvent::Message(text)),
            Ok(Message::Binary(_)) => {
                tracing::debug!("Binary frames not supported");
            }
            Ok(Message::Close(frame)) => {
                if let Some(frame) = frame {
                    code = u16::from(frame.code);
                    reason = frame.reason.into_owned();
                }
                tracing::info!(close_code = code, reason = %reason, "Server closed connection");
                break;
            }
            Ok(_) => {
                // Ping/Pong handled by tungstenite
            }
            Err(e) => {
                tracing::warn!(error = %e, "WebSocket error");
                sink(TransportEvent::Error(e.to_string()));
                reason = e.to_string();
                break;
            }
        }
    }

    write_task.abort();

    if inner.is_current(generation) {
        inner.open.store(false, Ordering::SeqCst);
        inner.writer.lock().take();
        sink(TransportEvent::Close { code, reason });
    }
}
