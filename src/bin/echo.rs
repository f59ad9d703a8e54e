//! Echo bot: a minimal webhook that shouts text messages back.
//!
//! Shares the Telegram client and the acknowledgment contract with the
//! weather bot, but carries no weather or speech logic.

use std::process;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use teloxide::Bot;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use pogoda_bot::bot::handler::ack;
use pogoda_bot::bot::telegram::TelegramClient;
use pogoda_bot::bot::update::{parse_update, InboundKind};
use pogoda_bot::config::{BIND_ADDR_VAR, TELEGRAM_TOKEN_VAR};

const TEXT_ONLY: &str = "Могу обработать только текстовое сообщение!";

async fn webhook(
    State(telegram): State<Arc<TelegramClient>>,
    body: String,
) -> (StatusCode, &'static str) {
    let inbound = match parse_update(&body) {
        Ok(Some(inbound)) => inbound,
        Ok(None) => return ack(),
        Err(e) => {
            warn!("Ignoring undecodable update: {e}");
            return ack();
        }
    };

    let reply = match &inbound.kind {
        InboundKind::Command(text) | InboundKind::Text(text) => text.to_uppercase(),
        _ => TEXT_ONLY.to_string(),
    };

    if let Err(e) = telegram
        .send_message(inbound.chat_id, &reply, inbound.message_id)
        .await
    {
        warn!("Reply delivery failed: {e}");
    }

    ack()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token = match std::env::var(TELEGRAM_TOKEN_VAR) {
        Ok(token) if !token.is_empty() => token,
        _ => {
            eprintln!("environment variable {TELEGRAM_TOKEN_VAR} is not set");
            process::exit(1);
        }
    };
    let bind_addr = std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let telegram = Arc::new(TelegramClient::new(Bot::new(&token)));
    let router = Router::new()
        .route("/webhook", post(webhook))
        .with_state(telegram);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind webhook address");
    info!("Echo webhook listening on {bind_addr}");

    axum::serve(listener, router).await.expect("webhook server failed");
}
