//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
//! Bridge between the AURA session and the hosted generative model.
//!
//! Chat replies never fail from the caller's point of view: every error maps to
//! one of the fixed fallback sentences. Speech synthesis is best effort.

pub mod audio;
pub mod errors;
pub mod gemini;
pub mod prompt;
pub mod sink;
pub mod speech;

use async_trait::async_trait;
use bytes::Bytes;

pub use audio::{decode_pcm, pcm_to_wav};
pub use errors::{AssistError, Result};
pub use gemini::GeminiClient;
pub use prompt::{system_instruction, ChatRequest};
pub use sink::{NullSink, SpeechClip, SpeechSink, WavDirectorySink};
pub use speech::SpeechPipeline;

/// Reply used when no credential is configured.
pub const FALLBACK_MISSING_KEY: &str = "API Key missing. Please configure the environment.";
/// Reply used when the model answers with no text.
pub const FALLBACK_EMPTY_REPLY: &str = "I'm having trouble processing that right now.";
/// Reply used when the request itself fails.
pub const FALLBACK_TRANSPORT: &str = "Connection to AURA Core failed. Please try again.";

/// Generative backend used by the session runtime.
#[async_trait]
pub trait AssistantBackend: Send + Sync + 'static {
    /// Produce a chat reply. Failures are folded into a fallback sentence.
    async fn reply(&self, request: ChatRequest) -> String;

    /// Synthesize raw 16-bit mono PCM for `text`. `Ok(None)` means the model
    /// returned no audio.
    async fn synthesize(&self, text: &str) -> Result<Option<Bytes>>;
}
