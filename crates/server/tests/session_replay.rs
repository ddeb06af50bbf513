use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use handwave_common::config::{AppConfig, ServerConfig};
use handwave_common::logging::init_test_logging;
use handwave_gesture_model::{GestureEvent, NavAction, ScrollDirection};
use handwave_server::{run_session, FrameInput, GestureServer, PipelineFactory};
use handwave_vision::PipelineExit;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
        .join("landmarks.jsonl")
}

fn headless_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.camera.preview = false;
    config.camera.idle_delay_ms = 0;
    config.camera.frame_delay_ms = 0;
    config
}

fn replay_factory() -> Arc<PipelineFactory> {
    Arc::new(PipelineFactory::new(
        headless_config(),
        FrameInput::Replay(fixture_path()),
    ))
}

#[tokio::test]
async fn replay_session_streams_all_events_in_order() {
    let factory = replay_factory();
    let (tx, mut rx) = mpsc::channel(4);
    let stop = Arc::new(AtomicBool::new(false));

    let session = tokio::task::spawn_blocking(move || run_session(factory.as_ref(), 1, stop, tx));

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let exit = session.await.unwrap().unwrap();

    assert_eq!(exit, PipelineExit::SourceClosed);
    assert_eq!(events.len(), 33);
    assert!(matches!(events[0], GestureEvent::Cursor { .. }));

    let non_cursor: Vec<_> = events
        .into_iter()
        .filter(|e| !matches!(e, GestureEvent::Cursor { .. }))
        .collect();
    assert_eq!(
        non_cursor,
        vec![
            GestureEvent::scroll(ScrollDirection::Stop),
            GestureEvent::gesture(NavAction::Next),
            GestureEvent::scroll(ScrollDirection::Down),
            GestureEvent::scroll(ScrollDirection::Up),
            GestureEvent::gesture(NavAction::Back),
        ]
    );
}

#[tokio::test]
async fn sessions_do_not_share_gesture_state() {
    let factory = replay_factory();

    let mut runs = Vec::new();
    for id in 1..=2 {
        let factory = factory.clone();
        let (tx, mut rx) = mpsc::channel(64);
        let stop = Arc::new(AtomicBool::new(false));
        let session =
            tokio::task::spawn_blocking(move || run_session(factory.as_ref(), id, stop, tx));

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        session.await.unwrap().unwrap();
        runs.push(events);
    }

    assert_eq!(runs[0], runs[1]);
}

#[tokio::test]
async fn dropped_receiver_ends_session_as_disconnect() {
    let factory = replay_factory();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let stop = Arc::new(AtomicBool::new(false));

    let result = tokio::task::spawn_blocking(move || run_session(factory.as_ref(), 1, stop, tx))
        .await
        .unwrap();

    assert!(result.unwrap_err().is_disconnect());
}

#[tokio::test]
async fn missing_recording_fails_to_open_session() {
    let factory = PipelineFactory::new(
        headless_config(),
        FrameInput::Replay(PathBuf::from("/nonexistent/landmarks.jsonl")),
    );
    let (tx, _rx) = mpsc::channel(1);
    let stop = Arc::new(AtomicBool::new(false));

    let result = tokio::task::spawn_blocking(move || run_session(&factory, 1, stop, tx))
        .await
        .unwrap();
    assert!(result.is_err());
}

#[tokio::test]
async fn server_stops_when_shutdown_resolves() {
    init_test_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = GestureServer::new(ServerConfig::default(), replay_factory());

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = stop_rx.await;
    }));

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[test]
fn factory_picks_replay_input_from_config() {
    let mut config = AppConfig::default();
    assert_eq!(
        PipelineFactory::from_config(config.clone()).input(),
        &FrameInput::Camera
    );

    config.detector.replay_path = Some(fixture_path());
    assert_eq!(
        PipelineFactory::from_config(config).input(),
        &FrameInput::Replay(fixture_path())
    );
}
