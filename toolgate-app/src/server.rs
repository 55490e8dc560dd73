use crate::auth::{self, ApiKeys};
use crate::routes::{health, mcp};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use toolgate_core::Gateway;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub keys: ApiKeys,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>, keys: ApiKeys) -> Self {
        Self { gateway, keys }
    }
}

pub fn router(state: AppState) -> Router {
    let mcp_routes = Router::new()
        .route(
            "/mcp",
            get(mcp::list_tools)
                .post(mcp::execute_tool)
                .delete(mcp::reset_tools),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(mcp_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let gateway = Arc::clone(&state.gateway);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    let snapshot = gateway.metrics().snapshot();
    tracing::info!(
        invocations = snapshot.invocations,
        successes = snapshot.successes,
        rejected_tools = snapshot.rejected_tools,
        rejected_inputs = snapshot.rejected_inputs,
        tool_failures = snapshot.tool_failures,
        internal_failures = snapshot.internal_failures,
        timeouts = snapshot.timeouts,
        success_rate = snapshot.success_rate(),
        "Server stopped"
    );
    Ok(())
}
