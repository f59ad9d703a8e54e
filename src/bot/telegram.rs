//! Telegram client using teloxide.

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, MessageId, ReplyParameters};
use tracing::{info, warn};

/// Telegram API client. Replies are always threaded back to the message
/// that triggered them.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: i64,
    ) -> Result<(), String> {
        let reply_params = ReplyParameters::new(MessageId(reply_to_message_id as i32));

        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_parameters(reply_params)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    /// Send a voice reply from bytes (OGG Opus format).
    pub async fn send_voice(
        &self,
        chat_id: i64,
        voice_data: Vec<u8>,
        reply_to_message_id: i64,
    ) -> Result<(), String> {
        info!("🔊 Sending voice to chat {} ({} bytes)", chat_id, voice_data.len());

        let input_file = InputFile::memory(voice_data).file_name("voice.ogg");
        let reply_params = ReplyParameters::new(MessageId(reply_to_message_id as i32));

        self.bot
            .send_voice(ChatId(chat_id), input_file)
            .reply_parameters(reply_params)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send voice: {e}");
                warn!("{}", msg);
                msg
            })
    }

    /// Download a voice message by file_id: resolve the file path first,
    /// then fetch the content.
    pub async fn download_voice(&self, file_id: &str) -> Result<Vec<u8>, String> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| format!("Failed to get file info: {e}"))?;

        let mut data = Vec::new();
        self.bot
            .download_file(&file.path, &mut data)
            .await
            .map_err(|e| format!("Failed to download file: {e}"))?;

        info!("📥 Downloaded voice ({} bytes)", data.len());
        Ok(data)
    }
}
