//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aura_assist::{AssistantBackend, ChatRequest, SpeechClip, SpeechPipeline, SpeechSink};
use aura_common::config::SimulationConfig;
use aura_common::time::fixed_stamp;
use aura_core::state::INITIAL_GREETING;
use aura_core::{
    AppState, Answer, BookingFlowStage, Command, CommandError, Session, SessionHandle,
    ServiceSlot, Stage,
};
use aura_sim::{Scenario, SilentNoise, TelemetrySimulator, TelemetrySnapshot};
use bytes::Bytes;
use tokio::time::sleep;

struct CannedBackend;

#[async_trait]
impl AssistantBackend for CannedBackend {
    async fn reply(&self, request: ChatRequest) -> String {
        format!("Voltage is {:.1}V.", request.telemetry.voltage_v)
    }

    async fn synthesize(&self, _text: &str) -> aura_assist::Result<Option<Bytes>> {
        Ok(Some(Bytes::from_static(&[0, 0, 1, 0])))
    }
}

#[derive(Default)]
struct RecordingSink {
    spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSink for RecordingSink {
    async fn play(&self, clip: SpeechClip) -> aura_assist::Result<()> {
        self.spoken.lock().unwrap().push(clip.text);
        Ok(())
    }
}

fn fixed_clock() -> chrono::NaiveTime {
    fixed_stamp(12, 0)
}

fn spawn_quiet(config: SimulationConfig) -> SessionHandle {
    Session::with_simulator(
        config,
        TelemetrySimulator::with_noise(SilentNoise),
        Arc::new(CannedBackend),
    )
    .with_state(AppState::with_clock(fixed_clock))
    .spawn()
}

fn last_text(state: &AppState) -> String {
    state
        .transcript()
        .last()
        .map(|e| e.text.clone())
        .unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn alternator_run_completes_end_to_end() {
    let handle = spawn_quiet(SimulationConfig::default());
    handle.send(Command::StartAlternator).await.unwrap();
    assert_eq!(
        handle.send(Command::StartFatigue).await.unwrap_err(),
        CommandError::ScenarioActive(Scenario::Alternator)
    );

    sleep(Duration::from_secs(45)).await;
    let state = handle.snapshot();
    assert_eq!(state.booking(), Some(BookingFlowStage::Prompt));
    assert_eq!(state.stage(), Stage::AwaitingChoice);
    assert_eq!(state.accept_label(), "Yes, Book Diagnostic");

    handle.send(Command::Respond(Answer::Accept)).await.unwrap();
    handle
        .send(Command::SelectSlot(ServiceSlot::TodayAfternoon))
        .await
        .unwrap();
    sleep(Duration::from_secs(10)).await;

    let state = handle.snapshot();
    assert_eq!(state.scenario(), None);
    assert_eq!(state.stage(), Stage::Idle);
    assert_eq!(state.telemetry().voltage_v, TelemetrySnapshot::NOMINAL_VOLTAGE_V);
    assert!(state
        .transcript()
        .entries()
        .iter()
        .any(|e| e.text.contains("appointment is set for Today, 4:00 PM")));
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn time_scale_shortens_the_whole_run() {
    let config = SimulationConfig {
        time_scale: 0.01,
        ..SimulationConfig::default()
    };
    let handle = spawn_quiet(config);
    handle.send(Command::StartFatigue).await.unwrap();
    sleep(Duration::from_secs(2)).await;

    let state = handle.snapshot();
    assert_eq!(state.booking(), Some(BookingFlowStage::Prompt));
    assert_eq!(state.accept_label(), "Yes, Find Rest Stop");
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_scheduled_steps() {
    let handle = spawn_quiet(SimulationConfig::default());
    handle.send(Command::PushToTalk).await.unwrap();
    assert!(handle.snapshot().voice().listening);
    handle.send(Command::Reset).await.unwrap();
    sleep(Duration::from_secs(5)).await;

    let state = handle.snapshot();
    assert!(!state.voice().listening);
    assert!(state.voice().draft.is_empty());
    assert_eq!(last_text(&state), INITIAL_GREETING);
    assert_eq!(state.epoch(), 1);
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn chat_reply_lands_in_transcript() {
    let handle = spawn_quiet(SimulationConfig::default());
    handle
        .send(Command::SendChat("How is the alternator?".into()))
        .await
        .unwrap();
    sleep(Duration::from_millis(50)).await;

    let state = handle.snapshot();
    assert!(!state.chat_pending());
    assert_eq!(last_text(&state), "Voltage is 13.5V.");
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn assistant_lines_reach_the_speech_sink() {
    let sink = Arc::new(RecordingSink::default());
    let backend: Arc<dyn AssistantBackend> = Arc::new(CannedBackend);
    let speech = SpeechPipeline::new(backend.clone(), sink.clone(), 24_000, true);
    let handle = Session::with_simulator(
        SimulationConfig::default(),
        TelemetrySimulator::with_noise(SilentNoise),
        backend,
    )
    .with_speech(speech)
    .spawn();

    handle.send(Command::StartAlternator).await.unwrap();
    sleep(Duration::from_millis(100)).await;

    let spoken = sink.spoken.lock().unwrap().clone();
    assert_eq!(
        spoken,
        vec![INITIAL_GREETING.to_owned(), "Monitoring systems...".to_owned()]
    );
    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn snapshots_publish_every_tick() {
    let handle = spawn_quiet(SimulationConfig::default());
    let mut updates = handle.subscribe();
    sleep(Duration::from_millis(1_100)).await;
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().tick(), 1);
    handle.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn snapshot_reflects_each_command_once_send_returns() {
    let handle = spawn_quiet(SimulationConfig::default());
    for i in 0..2_000 {
        let text = format!("draft {i}");
        handle.send(Command::SetDraft(text.clone())).await.unwrap();
        assert_eq!(handle.snapshot().voice().draft, text);
    }
    handle.send(Command::SendChat("status?".into())).await.unwrap();
    let state = handle.snapshot();
    assert!(state.transcript().entries().iter().any(|e| e.text == "status?"));
    assert!(state.voice().draft.is_empty());
    handle.shutdown().await.unwrap();
}
