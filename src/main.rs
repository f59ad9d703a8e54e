use std::process;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::prelude::*;

use pogoda_bot::bot::handler::{webhook_router, App};
use pogoda_bot::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pogoda_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            process::exit(1);
        }
    };

    info!("🚀 Starting pogoda-bot...");

    let app = Arc::new(App::new(&config));
    let router = webhook_router(app);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("failed to bind webhook address");
    info!("Webhook listening on {}", config.bind_addr);

    axum::serve(listener, router).await.expect("webhook server failed");
}
