use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use tts::{EspeakEngine, TtsService};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from .env never override the real environment
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    // Initialize logging
    let default_level = match &config {
        Ok(c) if c.debug => "debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;

    tracing::info!("Speech MP3 Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Speech engine: {} ({})", config.engine.binary, config.engine.language);
    if config.debug {
        tracing::warn!("Debug mode is on: error responses include engine details");
    }

    // Enumerate voices once; an engine that cannot list voices is fatal
    let engine = Arc::new(EspeakEngine::new(&config.engine));
    let tts = TtsService::new(engine, &config.engine)?;

    let state = Arc::new(AppState {
        tts,
        debug: config.debug,
    });
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting server on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
