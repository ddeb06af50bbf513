//! Serve gesture events over WebSocket.

use std::sync::Arc;

use handwave_common::config::AppConfig;
use handwave_server::{GestureServer, PipelineFactory};

use crate::ServeArgs;

pub async fn run(mut config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    apply_overrides(&mut config, args);

    let factory = PipelineFactory::from_config(config.clone());
    tracing::info!(
        url = %config.server.ws_url(),
        input = ?factory.input(),
        preview = config.camera.preview,
        "Starting gesture server"
    );

    GestureServer::new(config.server, Arc::new(factory)).run().await
}

fn apply_overrides(config: &mut AppConfig, args: ServeArgs) {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(index) = args.camera {
        config.camera.index = index;
    }
    if args.no_preview {
        config.camera.preview = false;
    }
    if let Some(path) = args.replay {
        config.detector.replay_path = Some(path);
    }
    if let Some(command) = args.detector {
        config.detector.command = command.split_whitespace().map(str::to_string).collect();
    }
}
