//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use thiserror::Error;

/// Errors raised by the chat and speech bridge.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("no API credential configured")]
    MissingApiKey,
    #[error("request to generative endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generative endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("model response contained no text")]
    EmptyReply,
    #[error("audio payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("speech sink failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AssistError>;
