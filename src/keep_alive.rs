//! Tiny HTTP endpoint for uptime monitors.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub const ALIVE_BODY: &str = "Bot is alive! ✅";

pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    ALIVE_BODY
}

pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

/// Run the endpoint in the background. Failures are logged, never fatal.
pub fn spawn(addr: SocketAddr) -> JoinHandle<()> {
    tokio::spawn(async move {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Keep-alive server failed to bind {addr}: {e}");
                return;
            }
        };
        info!("✅ Keep-alive server listening on http://{addr}");
        if let Err(e) = serve(listener).await {
            error!("Keep-alive server stopped: {e}");
        }
    })
}
