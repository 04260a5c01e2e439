//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "01-bootstrap"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Scripted operator that answers prompts until a scenario resolves."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use aura_core::{Answer, AppState, BookingFlowStage, Command, ServiceSlot, SessionHandle};
use aura_sim::{Component, Scenario};
use tokio::sync::watch;
use tracing::{debug, info};

/// Operator choices for one headless run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub scenario: Scenario,
    pub components: Vec<Component>,
    pub answer: Answer,
    pub slot: ServiceSlot,
}

impl RunPlan {
    fn start_commands(&self) -> Result<Vec<Command>> {
        Ok(match self.scenario {
            Scenario::Alternator => vec![Command::StartAlternator],
            Scenario::Fatigue => vec![Command::StartFatigue],
            Scenario::EndOfLife => {
                ensure!(
                    !self.components.is_empty(),
                    "end-of-life needs at least one --component"
                );
                let mut commands = vec![Command::OpenComponentPicker];
                commands.extend(self.components.iter().copied().map(Command::ToggleComponent));
                commands.push(Command::ConfirmComponentPicker);
                commands
            }
        })
    }
}

/// Start the planned scenario, answer every prompt and return the state
/// published once the scenario has cleared.
pub async fn drive(handle: &SessionHandle, plan: &RunPlan, limit: Duration) -> Result<AppState> {
    let mut updates = handle.subscribe();
    for command in plan.start_commands()? {
        handle
            .send(command.clone())
            .await
            .with_context(|| format!("starting scenario with {command:?}"))?;
    }
    let _ = updates.borrow_and_update();
    info!(scenario = %plan.scenario, "scenario started");

    tokio::time::timeout(limit, answer_until_resolved(handle, plan, updates))
        .await
        .map_err(|_| {
            anyhow!(
                "scenario {} did not resolve within {}s",
                plan.scenario,
                limit.as_secs()
            )
        })?
}

async fn answer_until_resolved(
    handle: &SessionHandle,
    plan: &RunPlan,
    mut updates: watch::Receiver<AppState>,
) -> Result<AppState> {
    loop {
        updates
            .changed()
            .await
            .map_err(|_| anyhow!("session stopped before the scenario resolved"))?;
        let state = updates.borrow_and_update().clone();
        if state.scenario().is_none() {
            return Ok(state);
        }
        let answer = match state.booking() {
            Some(BookingFlowStage::Prompt) => Command::Respond(plan.answer),
            Some(BookingFlowStage::SlotSelection) => Command::SelectSlot(plan.slot),
            None => continue,
        };
        if let Err(err) = handle.send(answer).await {
            debug!(error = %err, "answer no longer applicable; waiting for next update");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use aura_assist::{AssistantBackend, ChatRequest};
    use aura_common::config::SimulationConfig;
    use aura_core::Session;
    use aura_sim::{ComponentHealthSet, SilentNoise, TelemetrySimulator};
    use bytes::Bytes;

    use super::*;

    struct Offline;

    #[async_trait]
    impl AssistantBackend for Offline {
        async fn reply(&self, _request: ChatRequest) -> String {
            String::new()
        }

        async fn synthesize(&self, _text: &str) -> aura_assist::Result<Option<Bytes>> {
            Ok(None)
        }
    }

    fn fast_session() -> SessionHandle {
        let config = SimulationConfig {
            time_scale: 0.01,
            ..SimulationConfig::default()
        };
        Session::with_simulator(config, TelemetrySimulator::with_noise(SilentNoise), Arc::new(Offline))
            .spawn()
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_life_pickup_restores_health() {
        let handle = fast_session();
        let plan = RunPlan {
            scenario: Scenario::EndOfLife,
            components: vec![Component::Battery, Component::Tires],
            answer: Answer::Accept,
            slot: ServiceSlot::TomorrowAfternoon,
        };
        let state = drive(&handle, &plan, Duration::from_secs(60)).await.unwrap();
        assert_eq!(state.health(), &ComponentHealthSet::baseline());
        assert_eq!(state.telemetry().eco_score, 95.0);
        assert!(state
            .transcript()
            .entries()
            .iter()
            .any(|e| e.text == "Pickup scheduled for Tomorrow, 1:00 PM."));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn declined_fatigue_run_ends_with_acknowledgement() {
        let handle = fast_session();
        let plan = RunPlan {
            scenario: Scenario::Fatigue,
            components: Vec::new(),
            answer: Answer::Decline,
            slot: ServiceSlot::TodayAfternoon,
        };
        let state = drive(&handle, &plan, Duration::from_secs(60)).await.unwrap();
        assert_eq!(
            state.transcript().last().map(|e| e.text.as_str()),
            Some("Understood. I'll keep monitoring the systems.")
        );
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_life_without_components_is_rejected() {
        let handle = fast_session();
        let plan = RunPlan {
            scenario: Scenario::EndOfLife,
            components: Vec::new(),
            answer: Answer::Accept,
            slot: ServiceSlot::TodayAfternoon,
        };
        let err = drive(&handle, &plan, Duration::from_secs(5)).await.unwrap_err();
        assert!(err.to_string().contains("--component"));
        handle.shutdown().await.unwrap();
    }
}
