//! Speech client for Yandex SpeechKit.
//!
//! Short-audio recognition (voice message in, text out) and synthesis
//! (weather report in, OGG Opus out), both over plain HTTP with a bearer
//! token.

use serde::Deserialize;
use tracing::{debug, info};

const STT_URL: &str = "https://stt.api.cloud.yandex.net/speech/v1/stt:recognize";
const TTS_URL: &str = "https://tts.api.cloud.yandex.net/speech/v1/tts:synthesize";

/// Voice identity for synthesized replies.
const TTS_VOICE: &str = "ermil";
const TTS_EMOTION: &str = "good";

/// Response from stt:recognize. `result` is absent when the service
/// reports an error instead of a transcript.
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    result: Option<String>,
}

/// SpeechKit API client.
pub struct SpeechClient {
    client: reqwest::Client,
    token: String,
}

impl SpeechClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Recognize speech in OGG Opus audio. A missing or empty result is an
    /// error: there is no place name to look up.
    pub async fn recognize(&self, audio: Vec<u8>) -> Result<String, String> {
        debug!("Recognizing {} bytes of audio", audio.len());

        let response = self
            .client
            .post(STT_URL)
            .bearer_auth(&self.token)
            .body(audio)
            .send()
            .await
            .map_err(|e| format!("STT request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("STT error {status}: {body}"));
        }

        let recognized = response
            .json::<RecognizeResponse>()
            .await
            .map_err(|e| format!("Failed to parse STT response: {e}"))?;

        match recognized.result {
            Some(text) if !text.trim().is_empty() => {
                info!("Recognized: \"{}\"", text);
                Ok(text)
            }
            _ => Err("STT response carried no recognized text".to_string()),
        }
    }

    /// Synthesize text into voice audio (OGG Opus).
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String> {
        let preview: String = text.chars().take(50).collect();
        info!("TTS: \"{}\"", preview);

        let response = self
            .client
            .post(TTS_URL)
            .bearer_auth(&self.token)
            .form(&[("text", text), ("voice", TTS_VOICE), ("emotion", TTS_EMOTION)])
            .send()
            .await
            .map_err(|e| format!("TTS request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("TTS error {status}: {body}"));
        }

        let voice = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read TTS response: {e}"))?;

        debug!("Got {} bytes of audio", voice.len());
        Ok(voice.to_vec())
    }
}
