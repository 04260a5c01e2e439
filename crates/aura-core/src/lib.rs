//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
//! Session state, diagnostic watcher, scripted agent sequencer and the tokio
//! runtime that owns them.

pub mod agents;
pub mod booking;
pub mod dialogue;
pub mod errors;
pub mod runtime;
pub mod scheduling;
pub mod sequencer;
pub mod state;
pub mod watcher;

pub use agents::{AgentActivity, PseudoAgent};
pub use booking::{Answer, BookingFlowStage, ServiceSlot};
pub use dialogue::{DialogueEntry, Speaker, SystemLog, SystemLogEntry, Transcript};
pub use errors::CommandError;
pub use runtime::{Command, Session, SessionHandle};
pub use sequencer::{Effect, EngagementWarning, SequenceStep, Stage};
pub use state::{AppState, VoiceState};
pub use watcher::Trigger;
