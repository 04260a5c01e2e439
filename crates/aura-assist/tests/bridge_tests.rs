//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aura_assist::{
    AssistError, AssistantBackend, ChatRequest, GeminiClient, SpeechClip, SpeechPipeline,
    SpeechSink, FALLBACK_MISSING_KEY, FALLBACK_TRANSPORT,
};
use aura_common::config::AssistantConfig;
use aura_sim::{ComponentHealthSet, TelemetrySnapshot};
use bytes::Bytes;
use url::Url;

fn request(prompt: &str) -> ChatRequest {
    ChatRequest {
        prompt: prompt.into(),
        telemetry: TelemetrySnapshot::initial(),
        health: ComponentHealthSet::baseline(),
    }
}

fn unreachable_config() -> AssistantConfig {
    AssistantConfig {
        base_url: Url::parse("http://127.0.0.1:1/").unwrap(),
        ..AssistantConfig::default()
    }
}

#[tokio::test]
async fn missing_key_yields_configuration_hint() {
    let client = GeminiClient::from_config(&unreachable_config())
        .unwrap()
        .with_api_key(None);
    assert_eq!(client.reply(request("How is my battery?")).await, FALLBACK_MISSING_KEY);
    assert!(matches!(
        client.synthesize("hello").await,
        Err(AssistError::MissingApiKey)
    ));
}

#[tokio::test]
async fn transport_failure_yields_connection_message() {
    let client = GeminiClient::from_config(&unreachable_config())
        .unwrap()
        .with_api_key(Some("test-key".into()));
    assert_eq!(client.reply(request("Status?")).await, FALLBACK_TRANSPORT);
}

struct FixedBackend {
    pcm: Option<Bytes>,
}

#[async_trait]
impl AssistantBackend for FixedBackend {
    async fn reply(&self, request: ChatRequest) -> String {
        request.prompt
    }

    async fn synthesize(&self, _text: &str) -> aura_assist::Result<Option<Bytes>> {
        Ok(self.pcm.clone())
    }
}

#[derive(Default)]
struct RecordingSink {
    clips: Mutex<Vec<SpeechClip>>,
    calls: AtomicUsize,
}

#[async_trait]
impl SpeechSink for RecordingSink {
    async fn play(&self, clip: SpeechClip) -> aura_assist::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.clips.lock().unwrap().push(clip);
        Ok(())
    }
}

#[tokio::test]
async fn pipeline_wraps_pcm_before_playback() {
    let sink = Arc::new(RecordingSink::default());
    let pipeline = SpeechPipeline::new(
        Arc::new(FixedBackend {
            pcm: Some(Bytes::from_static(&[0, 0, 1, 0])),
        }),
        sink.clone(),
        24_000,
        true,
    );
    assert!(pipeline.speak("All systems nominal.").await);
    let clips = sink.clips.lock().unwrap();
    assert_eq!(clips.len(), 1);
    assert_eq!(&clips[0].wav[0..4], b"RIFF");
    assert_eq!(clips[0].wav.len(), 44 + 4);
}

#[tokio::test]
async fn pipeline_stays_quiet_without_audio_or_when_disabled() {
    let sink = Arc::new(RecordingSink::default());
    let silent = SpeechPipeline::new(Arc::new(FixedBackend { pcm: None }), sink.clone(), 24_000, true);
    assert!(!silent.speak("hello").await);

    let disabled = SpeechPipeline::new(
        Arc::new(FixedBackend {
            pcm: Some(Bytes::from_static(&[0, 0])),
        }),
        sink.clone(),
        24_000,
        false,
    );
    assert!(!disabled.speak("hello").await);
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}
