//! Wordfall - headless driver for the competition game engine
//!
//! Wires configuration, the room API client and one game session together:
//! characters read from stdin become keystrokes, and the session's event
//! stream is logged. A renderer would subscribe to the same stream.

use anyhow::Result;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordfall::api::CompetitionClient;
use wordfall::config::Config;
use wordfall::game::{GameEvent, GameSession};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Wordfall");
    info!("Room API: {}", config.api_base_url);
    info!("Playing as: {}", config.user_name);

    let client = CompetitionClient::new(&config);
    let (session, handle) = GameSession::new(&config, client);

    let mut events = handle.subscribe();
    let session_task = tokio::spawn(session.run());

    // Log the event stream for observability
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                GameEvent::TimerTick { .. } => {} // too chatty for the log
                other => info!(event = ?other, "game event"),
            }
        }
    });

    // Forward stdin characters as keystrokes until EOF or Ctrl+C
    let keys = handle.clone();
    let input_task = tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = [0u8; 256];
        let mut pending = Vec::new();
        loop {
            match stdin.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    pending.extend_from_slice(&buf[..n]);
                    // Feed only complete UTF-8 sequences; keep the tail
                    let valid_up_to = match std::str::from_utf8(&pending) {
                        Ok(text) => {
                            for c in text.chars() {
                                keys.keystroke(c).await;
                            }
                            pending.len()
                        }
                        Err(err) => {
                            let valid = err.valid_up_to();
                            if let Ok(text) = std::str::from_utf8(&pending[..valid]) {
                                for c in text.chars() {
                                    keys.keystroke(c).await;
                                }
                            }
                            valid
                        }
                    };
                    pending.drain(..valid_up_to);
                }
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping session");
        }
        _ = input_task => {
            info!("Input closed, stopping session");
        }
    }

    handle.shutdown().await;
    let _ = session_task.await;
    printer.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
