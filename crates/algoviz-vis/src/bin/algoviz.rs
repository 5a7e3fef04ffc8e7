//! Algorithm playback server and headless runner.
//!
//! ```text
//! algoviz [serve] [port]           serve the HTTP/WebSocket API
//! algoviz run <algorithm> [speed]  play a preset once, logging each frame
//! ```

use std::env;

use algoviz_steps::{AlgorithmInput, AlgorithmKind};
use algoviz_vis::{spawn_playback, PlaybackController, ServerConfig, TracingSink, VisServer};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoviz=info,algoviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().skip(1).collect();
    let config = ServerConfig::from_env()?;

    match args.first().map(String::as_str) {
        Some("run") => {
            let kind: AlgorithmKind = args
                .get(1)
                .ok_or("usage: algoviz run <algorithm> [speed]")?
                .parse()?;
            let speed: Option<i64> = args.get(2).map(|s| s.parse()).transpose()?;
            run_headless(config, kind, speed).await
        }
        Some("serve") => serve(config, args.get(1).map(String::as_str)).await,
        port => serve(config, port).await,
    }
}

async fn serve(
    mut config: ServerConfig,
    port: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config = config.with_port(port.parse()?);
    }

    let server = VisServer::new(config)?;
    server.serve().await?;
    Ok(())
}

async fn run_headless(
    config: ServerConfig,
    kind: AlgorithmKind,
    speed: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = PlaybackController::new(config.playback)?;
    controller.on_step(TracingSink::new());

    let (done_tx, done) = oneshot::channel();
    let mut done_tx = Some(done_tx);
    controller.on_complete(move |summary| {
        if let Some(tx) = done_tx.take() {
            let _ = tx.send(*summary);
        }
    });

    let playback = spawn_playback(controller);
    if let Some(speed) = speed {
        playback.set_speed(speed).await?;
    }
    let report = playback.play(kind, AlgorithmInput::preset(kind)).await?;
    info!(algorithm = %kind, speed = report.speed, "running preset");

    tokio::select! {
        summary = done => {
            let summary = summary?;
            info!(algorithm = %summary.algorithm, steps = summary.steps, "run finished");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted");
            playback.cancel().await?;
        }
    }
    Ok(())
}
