//! boteco-mock - local stand-in for the Boteco API
//!
//! Configuration (environment, `.env` honored):
//! - `BOTECO_MOCK_PORT`: listen port (default 3030)
//! - `BOTECO_MOCK_TOKEN`: bearer token to require (default: none)
//! - `BOTECO_FIXTURE_DIR`: fixture directory (default: the client's fixtures)

use boteco_mock::MockState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

const DEFAULT_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../boteco-client/fixtures");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boteco_mock=info".into()),
        )
        .init();

    let port: u16 = std::env::var("BOTECO_MOCK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3030);
    let fixture_dir = std::env::var("BOTECO_FIXTURE_DIR")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE_DIR));

    let mut state = MockState::new(&fixture_dir);
    if let Some(token) = std::env::var("BOTECO_MOCK_TOKEN").ok().filter(|t| !t.is_empty()) {
        state = state.with_token(token);
        tracing::info!("Bearer token required on data endpoints");
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(fixtures = %fixture_dir.display(), "boteco-mock listening on {addr}");

    boteco_mock::run(listener, Arc::new(state)).await?;
    Ok(())
}
