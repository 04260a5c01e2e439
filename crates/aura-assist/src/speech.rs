//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::sync::Arc;

use aura_logging::{aura_debug, aura_warn, LogContext};

use crate::audio::pcm_to_wav;
use crate::sink::{SpeechClip, SpeechSink};
use crate::AssistantBackend;

/// Synthesize, wrap and hand off speech for assistant entries.
#[derive(Clone)]
pub struct SpeechPipeline {
    backend: Arc<dyn AssistantBackend>,
    sink: Arc<dyn SpeechSink>,
    sample_rate_hz: u32,
    enabled: bool,
}

impl SpeechPipeline {
    pub fn new(
        backend: Arc<dyn AssistantBackend>,
        sink: Arc<dyn SpeechSink>,
        sample_rate_hz: u32,
        enabled: bool,
    ) -> Self {
        Self {
            backend,
            sink,
            sample_rate_hz,
            enabled,
        }
    }

    /// Speak `text`. Returns true when a clip reached the sink.
    /// Failures are logged and swallowed.
    pub async fn speak(&self, text: &str) -> bool {
        if !self.enabled || text.trim().is_empty() {
            return false;
        }
        let ctx = LogContext::new().with_agent("speech");
        let pcm = match self.backend.synthesize(text).await {
            Ok(Some(pcm)) => pcm,
            Ok(None) => {
                aura_debug!(context = ctx, "speech model returned no audio");
                return false;
            }
            Err(err) => {
                aura_warn!(context = ctx, "speech synthesis failed: {}", err);
                return false;
            }
        };
        let clip = SpeechClip {
            text: text.to_owned(),
            wav: pcm_to_wav(&pcm, self.sample_rate_hz),
        };
        match self.sink.play(clip).await {
            Ok(()) => true,
            Err(err) => {
                aura_warn!(context = ctx, "speech playback failed: {}", err);
                false
            }
        }
    }
}
