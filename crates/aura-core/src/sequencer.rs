//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
//! Scripted agent sequences as an explicit state machine.
//!
//! Every delayed step is emitted as [`Effect::Schedule`]; the runtime sleeps
//! and feeds the step back through [`AppState::handle_step`] tagged with the
//! epoch it was scheduled in. Steps from an older epoch are dropped.

use std::time::Duration;

use aura_assist::ChatRequest;
use aura_logging::{aura_debug, aura_info, log_system_event, LogContext, SystemEventOutcome};
use aura_sim::{Scenario, TelemetrySnapshot};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::agents::PseudoAgent;
use crate::booking::{BookingFlowStage, ServiceSlot};
use crate::state::{AppState, VOICE_FALLBACK_TRANSCRIPT};
use crate::watcher::Trigger;

/// Where the scripted flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Idle,
    Diagnosing,
    Assessing,
    Engaging,
    AwaitingChoice,
    Scheduling,
    Recycling,
    Resolving,
}

/// Warnings the engagement agent can deliver after a master assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementWarning {
    Alternator,
    Fatigue,
}

impl EngagementWarning {
    /// Agent that detected the issue and hands off to the master agent.
    pub fn detector(self) -> PseudoAgent {
        match self {
            EngagementWarning::Alternator => PseudoAgent::Diagnosis,
            EngagementWarning::Fatigue => PseudoAgent::Jeevah,
        }
    }

    pub fn confidence(self) -> &'static str {
        match self {
            EngagementWarning::Alternator => "High",
            EngagementWarning::Fatigue => "Medium",
        }
    }

    pub fn priority(self) -> &'static str {
        match self {
            EngagementWarning::Alternator => "Critical",
            EngagementWarning::Fatigue => "Safety",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EngagementWarning::Alternator => {
                "⚠️ Hi Shreya, I've detected your vehicle's alternator is weakening. You have about 4 days before failure. Would you like to book a diagnostic at Andheri Center?"
            }
            EngagementWarning::Fatigue => {
                "🛑 Attention: I've detected signs of high fatigue. Reaction times are slowing. Would you like me to find the nearest rest stop?"
            }
        }
    }
}

pub const REST_STOP_CONFIRMATION: &str =
    "✅ Route updated to Starbucks (2km away). Cabin temp lowered to 20°C to assist alertness.";
pub const DECLINE_ACKNOWLEDGEMENT: &str = "Understood. I'll keep monitoring the systems.";
pub const RECYCLING_BATCH_LOG: &str =
    "Logged alternator for recycling (Batch: ALB2025-07). Updating circular loop.";
pub const RESOLVED_ECO_SCORE: f64 = 95.0;

/// A delayed continuation of a scripted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceStep {
    EndDataPulse,
    Assess(EngagementWarning),
    Engage(EngagementWarning),
    DeliverWarning(EngagementWarning),
    DeliverLifecycleAlert,
    ConfirmRestStop,
    AcknowledgeDecline,
    ConfirmAppointment(ServiceSlot),
    BeginRecyclingHandoff,
    FinishRecyclingHandoff,
    ConfirmPickup(ServiceSlot),
    FinishListening { session: u64 },
}

impl SequenceStep {
    /// Delay between the action that schedules this step and the step itself,
    /// before the configured time scale is applied.
    pub fn nominal_delay(&self) -> Duration {
        let millis = match self {
            SequenceStep::EndDataPulse => 500,
            SequenceStep::Assess(_) => 1500,
            SequenceStep::Engage(_) => 1500,
            SequenceStep::DeliverWarning(_) => 1000,
            SequenceStep::DeliverLifecycleAlert => 1500,
            SequenceStep::ConfirmRestStop => 1500,
            SequenceStep::AcknowledgeDecline => 1000,
            SequenceStep::ConfirmAppointment(_) => 2000,
            SequenceStep::BeginRecyclingHandoff => 1500,
            SequenceStep::FinishRecyclingHandoff => 2500,
            SequenceStep::ConfirmPickup(_) => 2000,
            SequenceStep::FinishListening { .. } => 2000,
        };
        Duration::from_millis(millis)
    }
}

/// Side effects requested by a state update.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Run `step` after `delay` unless the epoch has moved on.
    Schedule {
        delay: Duration,
        step: SequenceStep,
        epoch: u64,
    },
    /// Ask the assistant backend for a chat reply.
    RequestReply { request: ChatRequest, epoch: u64 },
    /// Synthesize and play an assistant line.
    Speak(String),
    /// Abort every scheduled step.
    CancelPending,
}

impl AppState {
    /// Start the sequence chosen by the watcher.
    pub(crate) fn fire(&mut self, trigger: Trigger, fx: &mut Vec<Effect>) {
        self.stage = Stage::Diagnosing;
        match trigger {
            Trigger::Diagnosis { issue } => {
                self.detect(EngagementWarning::Alternator, &format!("Identified Pattern: {issue}"), fx);
            }
            Trigger::HealthAlert { issue } => {
                self.detect(EngagementWarning::Fatigue, &format!("Health Alert: {issue}"), fx);
            }
            Trigger::Lifecycle { issue, .. } => {
                self.agents.activate(PseudoAgent::Pravaha);
                self.log(
                    PseudoAgent::Pravaha.log_label(),
                    &format!("Lifecycle Alert: {issue}"),
                );
                self.trace_stage(PseudoAgent::Pravaha, "lifecycle alert raised");
                self.schedule(SequenceStep::DeliverLifecycleAlert, fx);
            }
        }
    }

    fn detect(&mut self, warning: EngagementWarning, action: &str, fx: &mut Vec<Effect>) {
        let detector = warning.detector();
        self.agents.activate(detector);
        self.log(detector.log_label(), action);
        self.trace_stage(detector, action);
        self.schedule(SequenceStep::Assess(warning), fx);
    }

    /// Execute a scheduled step. Steps from an earlier epoch are ignored.
    pub fn handle_step(&mut self, epoch: u64, step: SequenceStep) -> Vec<Effect> {
        if epoch != self.epoch {
            aura_debug!("dropping stale step {:?} from epoch {}", step, epoch);
            return Vec::new();
        }
        let mut fx = Vec::new();
        match step {
            SequenceStep::EndDataPulse => self.agents.deactivate(PseudoAgent::Data),
            SequenceStep::Assess(warning) => {
                self.agents.deactivate(warning.detector());
                self.agents.activate(PseudoAgent::Master);
                self.stage = Stage::Assessing;
                let action = format!(
                    "Assessing Risk: {}. Confidence: {}.",
                    warning.priority(),
                    warning.confidence()
                );
                self.log(PseudoAgent::Master.log_label(), &action);
                self.trace_stage(PseudoAgent::Master, &action);
                self.schedule(SequenceStep::Engage(warning), &mut fx);
            }
            SequenceStep::Engage(warning) => {
                self.agents.deactivate(PseudoAgent::Master);
                self.agents.activate(PseudoAgent::Engagement);
                self.stage = Stage::Engaging;
                self.log(
                    PseudoAgent::Engagement.log_label(),
                    "Constructing personalized message context...",
                );
                self.schedule(SequenceStep::DeliverWarning(warning), &mut fx);
            }
            SequenceStep::DeliverWarning(warning) => {
                self.say(warning.message(), &mut fx);
                self.open_prompt();
                self.agents.deactivate(PseudoAgent::Engagement);
            }
            SequenceStep::DeliverLifecycleAlert => {
                let materials = self.selection.materials();
                self.say(
                    format!(
                        "♻️ Alert: Components have reached end-of-lifecycle. Efficiency compromised. Material: {materials}. Would you like to initiate the circular economy protocol?"
                    ),
                    &mut fx,
                );
                self.open_prompt();
                self.agents.deactivate(PseudoAgent::Pravaha);
            }
            SequenceStep::ConfirmRestStop => {
                self.say(REST_STOP_CONFIRMATION, &mut fx);
                self.agents.deactivate(PseudoAgent::Engagement);
                self.resolve("rest stop routed");
            }
            SequenceStep::AcknowledgeDecline => {
                self.say(DECLINE_ACKNOWLEDGEMENT, &mut fx);
                self.agents.deactivate(PseudoAgent::Engagement);
                self.resolve("operator declined");
            }
            SequenceStep::ConfirmAppointment(slot) => {
                self.agents.deactivate(PseudoAgent::Scheduling);
                self.say(
                    format!("✅ Confirmed. Your appointment is set for {slot}. Parts have been reserved."),
                    &mut fx,
                );
                self.stage = Stage::Recycling;
                self.schedule(SequenceStep::BeginRecyclingHandoff, &mut fx);
            }
            SequenceStep::BeginRecyclingHandoff => {
                if self.scenario == Some(Scenario::Alternator) {
                    self.agents.activate(PseudoAgent::Pravaha);
                    self.log(PseudoAgent::Pravaha.log_label(), RECYCLING_BATCH_LOG);
                    self.schedule(SequenceStep::FinishRecyclingHandoff, &mut fx);
                } else {
                    self.stage = Stage::Idle;
                }
            }
            SequenceStep::FinishRecyclingHandoff => {
                self.agents.deactivate(PseudoAgent::Pravaha);
                self.telemetry.voltage_v = TelemetrySnapshot::NOMINAL_VOLTAGE_V;
                self.resolve("alternator booked and logged for recycling");
            }
            SequenceStep::ConfirmPickup(slot) => {
                let materials = self.selection.materials();
                self.log(
                    PseudoAgent::Pravaha.log_label(),
                    &format!("Tagged for recovery: {materials}."),
                );
                self.say(
                    format!("✅ Confirmed. 'GreenCycle Partners' will pick up the parts on {slot}. Material recovery estimated at 92%."),
                    &mut fx,
                );
                self.agents.deactivate(PseudoAgent::Pravaha);
                self.health.reset();
                self.telemetry.eco_score = RESOLVED_ECO_SCORE;
                self.resolve("components tagged for recovery");
            }
            SequenceStep::FinishListening { session } => {
                if self.voice.listening && self.voice.session == session {
                    self.voice.listening = false;
                    self.voice.draft = VOICE_FALLBACK_TRANSCRIPT.to_owned();
                }
            }
        }
        fx
    }

    fn open_prompt(&mut self) {
        self.booking = Some(BookingFlowStage::Prompt);
        self.stage = Stage::AwaitingChoice;
    }

    /// Terminal state of every run.
    fn resolve(&mut self, message: &str) {
        let name = self.scenario.map(|s| s.to_string()).unwrap_or_default();
        let ctx = LogContext::new()
            .with_scenario(&name)
            .with_stage(self.stage.as_ref())
            .with_tick(self.tick);
        log_system_event(Some(&ctx), "scenario.resolved", message, SystemEventOutcome::Resolved);
        self.scenario = None;
        self.stage = Stage::Idle;
        self.booking = None;
    }

    fn trace_stage(&self, agent: PseudoAgent, action: &str) {
        let name = self.scenario.map(|s| s.to_string()).unwrap_or_default();
        let ctx = LogContext::new()
            .with_scenario(&name)
            .with_stage(self.stage.as_ref())
            .with_agent(agent.as_ref())
            .with_tick(self.tick);
        aura_info!(context = ctx, "{}", action);
    }
}
