use axum::serve;
use expense_tracker_backend::config::AppConfig;
use expense_tracker_backend::{create_router, initialize_backend};
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (the log bridge picks up log:: records too)
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::load()?;

    info!("Setting up services");
    let app_state = initialize_backend(&config).await?;

    let app = create_router(app_state);

    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app).await?;

    Ok(())
}
