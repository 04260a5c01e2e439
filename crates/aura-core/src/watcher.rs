//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
//! Threshold checks run after every simulation tick.

use aura_sim::{label_list, Component, Scenario};

use crate::agents::PseudoAgent;
use crate::sequencer::Stage;
use crate::state::AppState;

pub const LOW_VOLTAGE_THRESHOLD_V: f64 = 11.8;
pub const FATIGUE_THRESHOLD_PCT: f64 = 80.0;
/// Once the transcript holds this many entries the watcher stays quiet.
pub const TRANSCRIPT_GUARD_LEN: usize = 3;

pub const ALTERNATOR_ISSUE: &str =
    "Low Voltage Detected (11.8V). Battery drainage signature matches 'Alternator Failure'.";
pub const FATIGUE_ISSUE: &str =
    "Driver eye-closure rate (PERCLOS) critical. Biometric stress detected.";

/// A scripted sequence the watcher wants to start.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Diagnosis { issue: String },
    HealthAlert { issue: String },
    Lifecycle { issue: String, failing: Vec<Component> },
}

/// Return the first sequence whose threshold is crossed, if any.
pub fn evaluate(state: &AppState) -> Option<Trigger> {
    if state.transcript().len() >= TRANSCRIPT_GUARD_LEN || state.stage() != Stage::Idle {
        return None;
    }
    let telemetry = state.telemetry();
    match state.scenario()? {
        Scenario::Alternator if telemetry.voltage_v < LOW_VOLTAGE_THRESHOLD_V => {
            Some(Trigger::Diagnosis {
                issue: ALTERNATOR_ISSUE.to_owned(),
            })
        }
        Scenario::Fatigue if telemetry.fatigue_pct > FATIGUE_THRESHOLD_PCT => {
            Some(Trigger::HealthAlert {
                issue: FATIGUE_ISSUE.to_owned(),
            })
        }
        Scenario::EndOfLife if !state.agents().is_active(PseudoAgent::Pravaha) => {
            let failing = state.health().failing(state.selection());
            if failing.is_empty() {
                return None;
            }
            Some(Trigger::Lifecycle {
                issue: format!("End-of-Life: {}. Recycling Loop Active.", label_list(&failing)),
                failing,
            })
        }
        _ => None,
    }
}
