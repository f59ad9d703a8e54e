//! Webhook dispatcher.
//!
//! One entry point: the webhook endpoint parses the update, plans an
//! action from the message kind, runs it against the clients, and always
//! acknowledges the delivery with an empty 200. Errors go to the user as
//! chat replies, never back to Telegram as HTTP failures.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use teloxide::Bot;
use tracing::warn;

use crate::bot::speech::SpeechClient;
use crate::bot::telegram::TelegramClient;
use crate::bot::update::{parse_update, Inbound, InboundKind};
use crate::bot::weather::{strip_indent, WeatherClient};
use crate::config::Config;

/// Longest voice message the bot will transcribe, in seconds.
const MAX_VOICE_SECS: u32 = 30;

pub const VOICE_LIMIT_TEXT: &str = "Голосовое сообщение должно быть короче 30 секунд";
pub const UNSUPPORTED_TEXT: &str = "Могу ответить только на текстовое или голосовое сообщение";
/// Reply when recognition produced no usable place name.
pub const RECOGNITION_FAILED_TEXT: &str = "Я не расслышал название населенного пункта";

/// Help text for /start and /help.
pub fn help_text() -> String {
    strip_indent(
        "
        Я расскажу о текущей погоде для населенного пункта.

        Я могу ответить на:
        - Текстовое сообщение с названием населенного пункта.
        - Голосовое сообщение с названием населенного пункта.
        - Сообщение с геопозицией.
        ",
    )
}

/// Shared clients, built once at startup and reused by every request.
pub struct App {
    pub telegram: TelegramClient,
    pub weather: WeatherClient,
    pub speech: SpeechClient,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            telegram: TelegramClient::new(Bot::new(&config.telegram_bot_token)),
            weather: WeatherClient::new(config.weather_api_key.clone()),
            speech: SpeechClient::new(config.speech_api_token.clone()),
        }
    }
}

/// What the dispatcher decided to do for one inbound message.
#[derive(Debug, PartialEq)]
enum Action {
    Reply(String),
    WeatherByName(String),
    WeatherByCoords { latitude: f64, longitude: f64 },
    VoicePipeline { file_id: String },
}

fn plan(kind: InboundKind) -> Action {
    match kind {
        InboundKind::Command(_) => Action::Reply(help_text()),
        InboundKind::Text(place) => Action::WeatherByName(place),
        InboundKind::Voice { duration, .. } if duration > MAX_VOICE_SECS => {
            Action::Reply(VOICE_LIMIT_TEXT.to_string())
        }
        InboundKind::Voice { file_id, .. } => Action::VoicePipeline { file_id },
        InboundKind::Location {
            latitude,
            longitude,
        } => Action::WeatherByCoords {
            latitude,
            longitude,
        },
        InboundKind::Unsupported => Action::Reply(UNSUPPORTED_TEXT.to_string()),
    }
}

/// The fixed acknowledgment every webhook delivery gets.
pub fn ack() -> (StatusCode, &'static str) {
    (StatusCode::OK, "")
}

pub fn webhook_router(app: Arc<App>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .with_state(app)
}

async fn webhook(State(app): State<Arc<App>>, body: String) -> (StatusCode, &'static str) {
    let inbound = match parse_update(&body) {
        Ok(Some(inbound)) => inbound,
        Ok(None) => return ack(),
        Err(e) => {
            warn!("Ignoring undecodable update: {e}");
            return ack();
        }
    };

    handle(&app, inbound).await;
    ack()
}

async fn handle(app: &App, inbound: Inbound) {
    let Inbound {
        message_id,
        chat_id,
        kind,
    } = inbound;

    match plan(kind) {
        Action::Reply(text) => reply_text(app, chat_id, message_id, &text).await,
        Action::WeatherByName(place) => {
            let report = app.weather.temperature_by_name(&place).await;
            reply_text(app, chat_id, message_id, &report).await;
        }
        Action::WeatherByCoords {
            latitude,
            longitude,
        } => {
            let report = app.weather.temperature_by_coords(latitude, longitude).await;
            reply_text(app, chat_id, message_id, &report).await;
        }
        Action::VoicePipeline { file_id } => {
            voice_pipeline(app, chat_id, message_id, &file_id).await;
        }
    }
}

/// The voice path, strictly in sequence: download, recognize, look up,
/// synthesize, send.
async fn voice_pipeline(app: &App, chat_id: i64, message_id: i64, file_id: &str) {
    let audio = match app.telegram.download_voice(file_id).await {
        Ok(audio) => audio,
        Err(e) => {
            warn!("Voice download failed, no reply sent: {e}");
            return;
        }
    };

    let place = match app.speech.recognize(audio).await {
        Ok(place) => place,
        Err(e) => {
            warn!("Recognition failed: {e}");
            reply_text(app, chat_id, message_id, RECOGNITION_FAILED_TEXT).await;
            return;
        }
    };

    let report = app.weather.temperature_by_name(&place).await;

    match app.speech.synthesize(&report).await {
        Ok(voice) => {
            if let Err(e) = app.telegram.send_voice(chat_id, voice, message_id).await {
                warn!("Voice delivery failed: {e}");
            }
        }
        Err(e) => {
            warn!("Synthesis failed, replying with text: {e}");
            reply_text(app, chat_id, message_id, &report).await;
        }
    }
}

/// Best-effort delivery: failures are logged and dropped.
async fn reply_text(app: &App, chat_id: i64, message_id: i64, text: &str) {
    if let Err(e) = app.telegram.send_message(chat_id, text, message_id).await {
        warn!("Reply delivery failed: {e}");
    }
}
