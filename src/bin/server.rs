//! msgsync reference store server
//!
//! Serves an in-memory message collection over HTTP. Contents are lost on
//! restart.
//!
//! # Configuration
//!
//! Environment variables:
//! - `MSGSYNC_HOST`: Address to bind (default: 127.0.0.1)
//! - `MSGSYNC_PORT`: Port to listen on (default: 8000)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint
//! - `GET /messages`: List messages
//! - `POST /messages`: Create a message
//! - `PUT /messages/{id}`: Update a message
//! - `DELETE /messages/{id}`: Delete a message

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use msgsync::server::{router, MemoryStore};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Address to bind
    host: IpAddr,
    /// Port to listen on
    port: u16,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let host = std::env::var("MSGSYNC_HOST")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let port = std::env::var("MSGSYNC_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self { host, port }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "msgsync=info,msgsync_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let app = router(Arc::new(MemoryStore::new()));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
