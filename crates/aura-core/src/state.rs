//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use aura_assist::ChatRequest;
use aura_common::time::{fixed_stamp, local_time_of_day};
use aura_logging::{aura_debug, log_system_event, LogContext, SystemEventOutcome};
use aura_sim::{
    Component, ComponentHealthSet, ComponentSelection, HealthDegrader, NoiseSource, Scenario,
    TelemetrySimulator, TelemetrySnapshot,
};
use chrono::NaiveTime;

use crate::agents::{AgentActivity, PseudoAgent};
use crate::booking::{Answer, BookingFlowStage, ServiceSlot};
use crate::dialogue::{DialogueEntry, SystemLog, Transcript};
use crate::errors::{CommandError, Result};
use crate::sequencer::{Effect, SequenceStep, Stage};
use crate::watcher;

pub const INITIAL_GREETING: &str = "Hello! AURA is monitoring your vehicle. All systems nominal.";
pub const VOICE_FALLBACK_TRANSCRIPT: &str = "Run system diagnostics";
const SYSTEM_AGENT: &str = "System";

/// Push-to-talk state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceState {
    pub listening: bool,
    pub draft: String,
    /// Incremented every time listening starts; stale finish steps are ignored.
    pub(crate) session: u64,
}

/// Whole application state. Mutated only by the operations below, each of
/// which returns the side effects the runtime must carry out.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) telemetry: TelemetrySnapshot,
    pub(crate) health: ComponentHealthSet,
    pub(crate) scenario: Option<Scenario>,
    pub(crate) stage: Stage,
    pub(crate) transcript: Transcript,
    pub(crate) system_log: SystemLog,
    pub(crate) agents: AgentActivity,
    pub(crate) booking: Option<BookingFlowStage>,
    pub(crate) selection: ComponentSelection,
    pub(crate) picker_open: bool,
    pub(crate) voice: VoiceState,
    pub(crate) chat_pending: bool,
    pub(crate) epoch: u64,
    pub(crate) tick: u64,
    degrader: HealthDegrader,
    clock: fn() -> NaiveTime,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_clock(local_time_of_day)
    }

    /// Build a state whose live dialogue stamps come from `clock`.
    pub fn with_clock(clock: fn() -> NaiveTime) -> Self {
        Self {
            telemetry: TelemetrySnapshot::initial(),
            health: ComponentHealthSet::baseline(),
            scenario: None,
            stage: Stage::Idle,
            transcript: Transcript::restart_with(initial_greeting()),
            system_log: SystemLog::default(),
            agents: AgentActivity::idle(),
            booking: None,
            selection: ComponentSelection::new(),
            picker_open: false,
            voice: VoiceState::default(),
            chat_pending: false,
            epoch: 0,
            tick: 0,
            degrader: HealthDegrader::default(),
            clock,
        }
    }

    pub fn telemetry(&self) -> &TelemetrySnapshot {
        &self.telemetry
    }

    pub fn health(&self) -> &ComponentHealthSet {
        &self.health
    }

    pub fn scenario(&self) -> Option<Scenario> {
        self.scenario
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn system_log(&self) -> &SystemLog {
        &self.system_log
    }

    pub fn agents(&self) -> &AgentActivity {
        &self.agents
    }

    pub fn booking(&self) -> Option<BookingFlowStage> {
        self.booking
    }

    pub fn selection(&self) -> &ComponentSelection {
        &self.selection
    }

    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn voice(&self) -> &VoiceState {
        &self.voice
    }

    pub fn chat_pending(&self) -> bool {
        self.chat_pending
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Label for the accept button of the booking prompt.
    pub fn accept_label(&self) -> &'static str {
        self.scenario
            .unwrap_or(Scenario::Alternator)
            .accept_label()
    }

    /// Effects to run once when a session starts.
    pub fn boot(&self) -> Vec<Effect> {
        self.transcript
            .last()
            .map(|entry| vec![Effect::Speak(entry.text.clone())])
            .unwrap_or_default()
    }

    /// Advance the simulation one tick, wear components and run the watcher.
    pub fn on_tick<N: NoiseSource>(&mut self, simulator: &mut TelemetrySimulator<N>) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.tick += 1;
        self.agents.activate(PseudoAgent::Data);
        self.schedule(SequenceStep::EndDataPulse, &mut fx);

        self.telemetry = simulator.step(&self.telemetry, self.scenario);
        self.degrader
            .degrade(&mut self.health, &self.selection, self.scenario);

        if let Some(trigger) = watcher::evaluate(self) {
            self.fire(trigger, &mut fx);
        }
        fx
    }

    pub fn start_alternator(&mut self) -> Result<Vec<Effect>> {
        self.start_scenario(
            Scenario::Alternator,
            "Monitoring systems...",
            fixed_stamp(9, 30),
            "Manual Fault Injection: Alternator Degradation".to_owned(),
        )
    }

    pub fn start_fatigue(&mut self) -> Result<Vec<Effect>> {
        self.start_scenario(
            Scenario::Fatigue,
            "Monitoring driver biometrics...",
            fixed_stamp(23, 0),
            "Manual Fault Injection: Driver Drowsiness".to_owned(),
        )
    }

    pub fn open_component_picker(&mut self) -> Result<Vec<Effect>> {
        self.ensure_no_scenario()?;
        if self.picker_open {
            return Err(CommandError::PickerOpen);
        }
        self.picker_open = true;
        self.selection.clear();
        Ok(Vec::new())
    }

    pub fn toggle_component(&mut self, component: Component) -> Result<Vec<Effect>> {
        if !self.picker_open {
            return Err(CommandError::PickerClosed);
        }
        self.selection.toggle(component);
        Ok(Vec::new())
    }

    /// Close the picker and, when anything was selected, start the end-of-life scenario.
    pub fn confirm_component_picker(&mut self) -> Result<Vec<Effect>> {
        if !self.picker_open {
            return Err(CommandError::PickerClosed);
        }
        self.ensure_no_scenario()?;
        self.picker_open = false;
        if self.selection.is_empty() {
            return Ok(Vec::new());
        }
        let action = format!(
            "Manual Event: Component End-of-Life ({} items)",
            self.selection.len()
        );
        self.start_scenario(
            Scenario::EndOfLife,
            "Analyzing component lifecycles...",
            fixed_stamp(14, 0),
            action,
        )
    }

    pub fn cancel_component_picker(&mut self) -> Result<Vec<Effect>> {
        if !self.picker_open {
            return Err(CommandError::PickerClosed);
        }
        self.picker_open = false;
        self.selection.clear();
        Ok(Vec::new())
    }

    /// Answer the booking prompt.
    pub fn respond(&mut self, answer: Answer) -> Result<Vec<Effect>> {
        if self.booking != Some(BookingFlowStage::Prompt) {
            return Err(CommandError::NoPendingPrompt);
        }
        let mut fx = Vec::new();
        match (answer, self.scenario) {
            (Answer::Accept, Some(Scenario::Fatigue)) => {
                self.hear(answer.user_text());
                self.booking = None;
                self.agents.activate(PseudoAgent::Engagement);
                self.stage = Stage::Resolving;
                self.schedule(SequenceStep::ConfirmRestStop, &mut fx);
            }
            (Answer::Accept, _) => {
                self.booking = Some(BookingFlowStage::SlotSelection);
            }
            (Answer::Decline, _) => {
                self.hear(answer.user_text());
                self.booking = None;
                self.agents.activate(PseudoAgent::Engagement);
                self.stage = Stage::Resolving;
                self.schedule(SequenceStep::AcknowledgeDecline, &mut fx);
            }
        }
        Ok(fx)
    }

    /// Pick a service slot from the booking prompt.
    pub fn select_slot(&mut self, slot: ServiceSlot) -> Result<Vec<Effect>> {
        match self.booking {
            Some(BookingFlowStage::SlotSelection) => {}
            Some(stage) => return Err(CommandError::SlotsNotOffered(stage)),
            None => return Err(CommandError::NoPendingPrompt),
        }
        let mut fx = Vec::new();
        self.booking = None;
        self.stage = Stage::Scheduling;
        if self.scenario == Some(Scenario::EndOfLife) {
            self.agents.activate(PseudoAgent::Pravaha);
            self.hear(format!("Pickup scheduled for {slot}."));
            self.schedule(SequenceStep::ConfirmPickup(slot), &mut fx);
        } else {
            self.hear(format!("Book for {slot}"));
            self.agents.activate(PseudoAgent::Scheduling);
            self.log(
                PseudoAgent::Scheduling.log_label(),
                "Querying workshop APIs for availability...",
            );
            self.schedule(SequenceStep::ConfirmAppointment(slot), &mut fx);
        }
        Ok(fx)
    }

    /// Send free text to the assistant backend.
    pub fn send_chat(&mut self, text: &str) -> Result<Vec<Effect>> {
        if text.trim().is_empty() {
            return Err(CommandError::EmptyMessage);
        }
        if self.chat_pending {
            return Err(CommandError::ReplyPending);
        }
        self.hear(text);
        self.voice.draft.clear();
        self.chat_pending = true;
        self.agents.activate(PseudoAgent::Engagement);
        Ok(vec![Effect::RequestReply {
            request: ChatRequest {
                prompt: text.to_owned(),
                telemetry: self.telemetry,
                health: self.health.clone(),
            },
            epoch: self.epoch,
        }])
    }

    /// Deliver a backend reply. Replies issued before a reset are dropped.
    pub fn apply_reply(&mut self, epoch: u64, reply: String) -> Vec<Effect> {
        if epoch != self.epoch {
            aura_debug!("dropping chat reply from epoch {}", epoch);
            return Vec::new();
        }
        let mut fx = Vec::new();
        self.chat_pending = false;
        self.say(reply, &mut fx);
        self.agents.deactivate(PseudoAgent::Engagement);
        fx
    }

    pub fn set_draft(&mut self, text: &str) -> Result<Vec<Effect>> {
        if self.voice.listening {
            return Err(CommandError::Listening);
        }
        self.voice.draft = text.to_owned();
        Ok(Vec::new())
    }

    /// Toggle voice capture. Without a recogniser the canned transcript lands
    /// in the draft after a short delay.
    pub fn push_to_talk(&mut self) -> Result<Vec<Effect>> {
        let mut fx = Vec::new();
        if self.voice.listening {
            self.voice.listening = false;
            return Ok(fx);
        }
        self.voice.listening = true;
        self.voice.session += 1;
        let session = self.voice.session;
        self.schedule(SequenceStep::FinishListening { session }, &mut fx);
        Ok(fx)
    }

    /// Restore the initial session and invalidate every pending step.
    pub fn reset(&mut self) -> Vec<Effect> {
        let scenario = self.scenario.map(|s| s.to_string()).unwrap_or_default();
        let ctx = LogContext::new().with_scenario(&scenario);
        log_system_event(
            Some(&ctx),
            "session.reset",
            "session restored to initial state",
            SystemEventOutcome::Aborted,
        );
        let system_log = std::mem::take(&mut self.system_log);
        let epoch = self.epoch + 1;
        let tick = self.tick;
        *self = Self {
            system_log,
            epoch,
            tick,
            ..Self::with_clock(self.clock)
        };
        let mut fx = vec![Effect::CancelPending];
        fx.extend(self.boot());
        fx
    }

    fn start_scenario(
        &mut self,
        scenario: Scenario,
        greeting: &str,
        stamp: NaiveTime,
        action: String,
    ) -> Result<Vec<Effect>> {
        self.ensure_no_scenario()?;
        let mut fx = Vec::new();
        self.scenario = Some(scenario);
        self.stage = Stage::Idle;
        self.booking = None;
        self.transcript = Transcript::restart_with(DialogueEntry::assistant(greeting, stamp));
        fx.push(Effect::Speak(greeting.to_owned()));
        self.log(SYSTEM_AGENT, action.as_str());
        let name = scenario.to_string();
        let ctx = LogContext::new().with_scenario(&name).with_tick(self.tick);
        log_system_event(Some(&ctx), "scenario.start", &action, SystemEventOutcome::Started);
        Ok(fx)
    }

    fn ensure_no_scenario(&self) -> Result<()> {
        match self.scenario {
            Some(active) => Err(CommandError::ScenarioActive(active)),
            None => Ok(()),
        }
    }

    pub(crate) fn now(&self) -> NaiveTime {
        (self.clock)()
    }

    /// Append an assistant line and queue it for speech.
    pub(crate) fn say(&mut self, text: impl Into<String>, fx: &mut Vec<Effect>) {
        let text = text.into();
        let stamp = self.now();
        self.transcript
            .push(DialogueEntry::assistant(text.clone(), stamp));
        fx.push(Effect::Speak(text));
    }

    pub(crate) fn hear(&mut self, text: impl Into<String>) {
        let stamp = self.now();
        self.transcript.push(DialogueEntry::user(text, stamp));
    }

    pub(crate) fn log(&mut self, agent: &str, action: &str) {
        let stamp = self.now();
        self.system_log.record(agent, action, stamp);
    }

    pub(crate) fn schedule(&self, step: SequenceStep, fx: &mut Vec<Effect>) {
        fx.push(Effect::Schedule {
            delay: step.nominal_delay(),
            step,
            epoch: self.epoch,
        });
    }
}

fn initial_greeting() -> DialogueEntry {
    DialogueEntry::assistant(INITIAL_GREETING, fixed_stamp(9, 0))
}
