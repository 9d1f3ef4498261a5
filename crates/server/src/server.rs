use crate::routes::api_routes;
use crate::{AppContext, Result, ServerError};
use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

/// The application router with request tracing
pub fn router(ctx: AppContext) -> Router {
    api_routes().with_state(ctx).layer(TraceLayer::new_for_http())
}

pub async fn start_server(ctx: AppContext, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid address: {e}")))?;

    tracing::info!("Starting GraphRAG API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(ctx)).await?;

    Ok(())
}
