//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::time::Duration;

use async_trait::async_trait;
use aura_common::config::AssistantConfig;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::audio::decode_pcm;
use crate::errors::{AssistError, Result};
use crate::prompt::{system_instruction, ChatRequest};
use crate::{AssistantBackend, FALLBACK_EMPTY_REPLY, FALLBACK_MISSING_KEY, FALLBACK_TRANSPORT};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_owned),
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }

    fn text(&self) -> Option<String> {
        let joined: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    fn audio_base64(&self) -> Option<&str> {
        self.first_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref().map(|d| d.data.as_str()))
    }
}

/// REST client for the hosted Gemini models.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    base_url: Url,
    chat_model: String,
    tts_model: String,
    voice: String,
}

impl GeminiClient {
    /// Build a client from configuration. The credential is resolved once here.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                env = %config.api_key_env,
                "no API credential found; chat replies will use the offline fallback"
            );
        } else {
            info!(chat_model = %config.chat_model, tts_model = %config.tts_model, "gemini client ready");
        }
        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.clone(),
            chat_model: config.chat_model.clone(),
            tts_model: config.tts_model.clone(),
            voice: config.voice.clone(),
        })
    }

    /// Replace the resolved credential.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("v1beta/models/{model}:generateContent"))?)
    }

    async fn generate(&self, model: &str, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let api_key = self.api_key.as_deref().ok_or(AssistError::MissingApiKey)?;
        let url = self.endpoint(model)?;
        debug!(%url, "calling generative endpoint");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Ask the chat model a question grounded in the supplied vehicle context.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), request.prompt.clone())],
            system_instruction: Some(Content::text(
                None,
                system_instruction(&request.telemetry, &request.health),
            )),
            generation_config: None,
        };
        self.generate(&self.chat_model, &body)
            .await?
            .text()
            .ok_or(AssistError::EmptyReply)
    }

    /// Synthesize speech for `text`, returning raw PCM.
    pub async fn speech(&self, text: &str) -> Result<Option<Bytes>> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(None, text)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                },
            }),
        };
        let response = self.generate(&self.tts_model, &body).await?;
        response.audio_base64().map(decode_pcm).transpose()
    }
}

#[async_trait]
impl AssistantBackend for GeminiClient {
    async fn reply(&self, request: ChatRequest) -> String {
        match self.chat(&request).await {
            Ok(text) => text,
            Err(AssistError::MissingApiKey) => FALLBACK_MISSING_KEY.to_owned(),
            Err(AssistError::EmptyReply) => FALLBACK_EMPTY_REPLY.to_owned(),
            Err(err) => {
                warn!(error = %err, "chat request failed");
                FALLBACK_TRANSPORT.to_owned()
            }
        }
    }

    async fn synthesize(&self, text: &str) -> Result<Option<Bytes>> {
        self.speech(text).await
    }
}
