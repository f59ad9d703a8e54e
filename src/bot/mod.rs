//! Weather bot modules - webhook dispatch, clients, report formatting.

pub mod handler;
pub mod speech;
pub mod telegram;
pub mod update;
pub mod weather;

pub use handler::{ack, webhook_router, App};
pub use speech::SpeechClient;
pub use telegram::TelegramClient;
pub use update::{parse_update, Inbound, InboundKind};
pub use weather::WeatherClient;
