//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use aura_sim::Scenario;
use thiserror::Error;

use crate::booking::BookingFlowStage;

/// Reasons an operator command is not applicable in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("scenario {0} is already active")]
    ScenarioActive(Scenario),
    #[error("component picker is already open")]
    PickerOpen,
    #[error("component picker is not open")]
    PickerClosed,
    #[error("no booking prompt is waiting for an answer")]
    NoPendingPrompt,
    #[error("booking prompt is at {0:?}, not slot selection")]
    SlotsNotOffered(BookingFlowStage),
    #[error("chat message is empty")]
    EmptyMessage,
    #[error("a chat reply is still pending")]
    ReplyPending,
    #[error("voice input is still listening")]
    Listening,
    #[error("session runtime has shut down")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, CommandError>;
