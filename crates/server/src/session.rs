//! One WebSocket client session.
//!
//! ```text
//!  blocking thread                 async tasks
//! ┌───────────────┐  mpsc   ┌──────────────┐  ws text  ┌────────┐
//! │ FramePipeline │ ──────▶ │ pump_events  │ ────────▶ │ client │
//! └───────────────┘         └──────────────┘           └────────┘
//!         ▲  stop flag      ┌──────────────┐   close       │
//!         └──────────────── │ watch_client │ ◀─────────────┘
//!                           └──────────────┘
//! ```
//!
//! The pipeline never blocks the runtime: it runs under `spawn_blocking` and
//! hands events to a bounded queue. A writer task drains the queue into the
//! socket. When the client closes, the stop flag ends the pipeline, which
//! releases the camera.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, SinkExt, Stream, StreamExt};
use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_gesture_model::GestureEvent;
use handwave_vision::{EventSink, PipelineExit};
use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use crate::factory::SessionFactory;

/// Event sink that feeds the session's outbound queue from the pipeline
/// thread. Blocks while the queue is full.
pub struct ChannelSink {
    tx: mpsc::Sender<GestureEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<GestureEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn send(&mut self, event: GestureEvent) -> HandwaveResult<()> {
        self.tx
            .blocking_send(event)
            .map_err(|_| HandwaveError::transport("client disconnected"))
    }
}

/// Open a pipeline and run it to completion. Must run on a blocking thread.
pub fn run_session(
    factory: &dyn SessionFactory,
    session_id: u64,
    stop_flag: Arc<AtomicBool>,
    tx: mpsc::Sender<GestureEvent>,
) -> HandwaveResult<PipelineExit> {
    let mut pipeline = factory.open_session(session_id)?.with_stop_flag(stop_flag);
    let mut sink = ChannelSink::new(tx);
    pipeline.run(&mut sink)
}

/// Forward queued events to the client as JSON text, then close the socket.
///
/// Returns the number of events written. Ends early if the client stops
/// accepting messages.
pub async fn pump_events<S>(mut rx: mpsc::Receiver<GestureEvent>, mut sink: S) -> HandwaveResult<u64>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut written = 0u64;
    while let Some(event) = rx.recv().await {
        let text = event.to_json()?;
        sink.send(Message::Text(text))
            .await
            .map_err(|e| HandwaveError::transport(format!("send failed: {e}")))?;
        written += 1;
    }

    // Best effort; the client may already be gone.
    let _ = sink.send(Message::Close(None)).await;
    let _ = sink.close().await;
    Ok(written)
}

/// Read from the client until it closes or errors. Incoming data is ignored.
pub async fn watch_client<S, E>(mut stream: S)
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Close(_)) => break,
            Ok(_) => tracing::trace!("Ignoring client message"),
            Err(e) => {
                tracing::debug!(error = %e, "Client read failed");
                break;
            }
        }
    }
}

/// Resolves once the server starts shutting down.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}

/// Drive a full session for an upgraded socket.
pub(crate) async fn handle_socket(
    socket: WebSocket,
    session_id: u64,
    factory: Arc<dyn SessionFactory>,
    queue_capacity: usize,
    mut shutdown: watch::Receiver<bool>,
) {
    let span = tracing::info_span!("session", id = session_id);
    async move {
        tracing::info!("Client connected");

        let (ws_tx, ws_rx) = socket.split();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let stop_flag = Arc::new(AtomicBool::new(false));

        let pipeline = tokio::task::spawn_blocking({
            let stop_flag = stop_flag.clone();
            move || run_session(factory.as_ref(), session_id, stop_flag, tx)
        });
        let writer = tokio::spawn(pump_events(rx, ws_tx).in_current_span());
        let reader = tokio::spawn(
            {
                let stop_flag = stop_flag.clone();
                async move {
                    tokio::select! {
                        _ = watch_client(ws_rx) => tracing::debug!("Client closed connection"),
                        _ = shutdown_requested(&mut shutdown) => {
                            tracing::debug!("Server shutting down, ending session");
                        }
                    }
                    stop_flag.store(true, Ordering::SeqCst);
                }
            }
            .in_current_span(),
        );

        let written = match writer.await {
            Ok(Ok(written)) => written,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Event writer stopped");
                0
            }
            Err(e) => {
                tracing::error!(error = %e, "Event writer task failed");
                0
            }
        };
        stop_flag.store(true, Ordering::SeqCst);

        match pipeline.await {
            Ok(Ok(exit)) => tracing::debug!(exit = ?exit, "Session pipeline finished"),
            Ok(Err(e)) if e.is_disconnect() => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Session pipeline failed"),
            Err(e) => tracing::error!(error = %e, "Session pipeline task panicked"),
        }
        reader.abort();

        tracing::info!(events = written, "Client disconnected");
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc as fmpsc;
    use handwave_gesture_model::{NavAction, ScrollDirection};

    #[tokio::test]
    async fn test_pump_events_writes_json_then_closes() {
        let (tx, rx) = mpsc::channel(8);
        let (ws_tx, mut ws_rx) = fmpsc::channel::<Message>(16);

        tx.send(GestureEvent::cursor(0.25, 0.5)).await.unwrap();
        tx.send(GestureEvent::scroll(ScrollDirection::Up)).await.unwrap();
        tx.send(GestureEvent::gesture(NavAction::Back)).await.unwrap();
        drop(tx);

        let written = pump_events(rx, ws_tx).await.unwrap();
        assert_eq!(written, 3);

        let mut texts = Vec::new();
        let mut closed = false;
        while let Some(message) = ws_rx.next().await {
            match message {
                Message::Text(text) => texts.push(text),
                Message::Close(_) => closed = true,
                other => panic!("unexpected message {other:?}"),
            }
        }
        assert_eq!(
            texts,
            vec![
                r#"{"type":"CURSOR","x":0.25,"y":0.5}"#.to_string(),
                r#"{"type":"SCROLL","dir":"UP"}"#.to_string(),
                r#"{"type":"GESTURE","action":"BACK"}"#.to_string(),
            ]
        );
        assert!(closed);
    }

    #[tokio::test]
    async fn test_pump_events_stops_when_client_is_gone() {
        let (tx, rx) = mpsc::channel(8);
        let (ws_tx, ws_rx) = fmpsc::channel::<Message>(16);
        drop(ws_rx);

        tx.send(GestureEvent::cursor(0.1, 0.1)).await.unwrap();
        let err = pump_events(rx, ws_tx).await.unwrap_err();
        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn test_watch_client_returns_on_close() {
        let messages: Vec<Result<Message, std::io::Error>> = vec![
            Ok(Message::Text("hello".to_string())),
            Ok(Message::Close(None)),
            Ok(Message::Text("never read".to_string())),
        ];
        let mut stream = futures::stream::iter(messages);
        watch_client(&mut stream).await;

        // The message after Close is left unread
        assert!(stream.next().await.is_some());
    }

    #[tokio::test]
    async fn test_channel_sink_reports_disconnect() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let result = tokio::task::spawn_blocking(move || {
            let mut sink = ChannelSink::new(tx);
            sink.send(GestureEvent::cursor(0.0, 0.0))
        })
        .await
        .unwrap();

        assert!(result.unwrap_err().is_disconnect());
    }
}
