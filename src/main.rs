use dotenvy::dotenv;
use tracing::info;

use videomoji::app;
use videomoji::config::settings::AppConfig;
use videomoji::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting processing server...");

    let config = AppConfig::new();
    let addr = format!("0.0.0.0:{}", config.server_port);

    let app = app::create_app(AppState::new(config)).await;

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
