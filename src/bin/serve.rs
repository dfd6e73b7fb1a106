use std::sync::Arc;

use dotenv::dotenv;
use log::{info, warn};

use footfall::server::{cors, router, AppState, Config};
use footfall::util::trace::initialize_tracer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing `.env` is fine, the environment may be set directly.
    let dotenv = dotenv();

    initialize_tracer();
    if let Err(err) = dotenv {
        warn!("No .env loaded: {err}");
    }

    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;
    let summary = state.graph.summary();
    if !summary.connected {
        warn!("Graph is not connected; some routes will not exist");
    }

    let graph = Arc::clone(&state.graph);
    let app = router(state).layer(cors(&config.allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!(
        "Starting server on {} with {} nodes and {} edges",
        listener.local_addr()?,
        graph.size(),
        graph.edge_count()
    );

    axum::serve(listener, app).await?;

    info!("Terminating server.");
    Ok(())
}
