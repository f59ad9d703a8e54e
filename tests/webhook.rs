//! Webhook contract tests.
//!
//! Every delivery must be acknowledged with an empty 200, including bodies
//! the bot cannot make sense of. Paths that would call external APIs are
//! exercised in the unit tests against the pure planning step instead.

use std::sync::Arc;

use pogoda_bot::bot::handler::{webhook_router, App};
use pogoda_bot::config::Config;

fn test_app() -> Arc<App> {
    let config = Config {
        telegram_bot_token: "123456789:TEST".to_string(),
        weather_api_key: "test-key".to_string(),
        speech_api_token: "test-token".to_string(),
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
    };
    Arc::new(App::new(&config))
}

#[tokio::test]
async fn test_webhook_acknowledges_with_empty_200() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, webhook_router(test_app())).await.ok();
    });

    let url = format!("http://{addr}/webhook");
    let client = reqwest::Client::new();

    // Undecodable body and a message-less update: both acknowledged, no reply.
    for body in ["definitely not json", r#"{"update_id": 7}"#] {
        let response = client
            .post(&url)
            .body(body.to_string())
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.expect("body"), "");
    }
}
