//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::sync::Arc;

use anyhow::Result;
use aura_assist::{AssistantBackend, SpeechPipeline};
use aura_common::config::SimulationConfig;
use aura_common::time::duration_to_millis;
use aura_sim::{Component, NoiseSource, TelemetrySimulator, UniformNoise};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::booking::{Answer, ServiceSlot};
use crate::errors::CommandError;
use crate::scheduling::{PendingSteps, RateLimiter};
use crate::sequencer::{Effect, SequenceStep};
use crate::state::AppState;

const COMMAND_QUEUE_DEPTH: usize = 32;

/// Operator commands accepted by a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartAlternator,
    StartFatigue,
    OpenComponentPicker,
    ToggleComponent(Component),
    ConfirmComponentPicker,
    CancelComponentPicker,
    Respond(Answer),
    SelectSlot(ServiceSlot),
    SendChat(String),
    SetDraft(String),
    PushToTalk,
    Reset,
}

impl Command {
    fn apply(self, state: &mut AppState) -> crate::errors::Result<Vec<Effect>> {
        match self {
            Command::StartAlternator => state.start_alternator(),
            Command::StartFatigue => state.start_fatigue(),
            Command::OpenComponentPicker => state.open_component_picker(),
            Command::ToggleComponent(component) => state.toggle_component(component),
            Command::ConfirmComponentPicker => state.confirm_component_picker(),
            Command::CancelComponentPicker => state.cancel_component_picker(),
            Command::Respond(answer) => state.respond(answer),
            Command::SelectSlot(slot) => state.select_slot(slot),
            Command::SendChat(text) => state.send_chat(&text),
            Command::SetDraft(text) => state.set_draft(&text),
            Command::PushToTalk => state.push_to_talk(),
            Command::Reset => Ok(state.reset()),
        }
    }
}

struct Envelope {
    command: Command,
    reply: oneshot::Sender<crate::errors::Result<()>>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope").field("command", &self.command).finish()
    }
}

/// Results posted back to the owner task by timers and backend calls.
#[derive(Debug)]
enum Completion {
    Step { epoch: u64, step: SequenceStep },
    Reply { epoch: u64, text: String },
}

/// Builder for the task that owns [`AppState`].
pub struct Session<N = UniformNoise> {
    config: SimulationConfig,
    simulator: TelemetrySimulator<N>,
    backend: Arc<dyn AssistantBackend>,
    speech: Option<SpeechPipeline>,
    state: AppState,
}

impl Session<UniformNoise> {
    pub fn new(config: SimulationConfig, backend: Arc<dyn AssistantBackend>) -> Self {
        let simulator = TelemetrySimulator::new(config.random_seed);
        Session::with_simulator(config, simulator, backend)
    }
}

impl<N: NoiseSource + Send + 'static> Session<N> {
    pub fn with_simulator(
        config: SimulationConfig,
        simulator: TelemetrySimulator<N>,
        backend: Arc<dyn AssistantBackend>,
    ) -> Self {
        Self {
            config,
            simulator,
            backend,
            speech: None,
            state: AppState::new(),
        }
    }

    pub fn with_speech(mut self, speech: SpeechPipeline) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    /// Spawn the owner task and return a handle for commands and snapshots.
    pub fn spawn(self) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.state.clone());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(command_rx, snapshot_tx, shutdown_rx));
        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        self,
        mut commands: mpsc::Receiver<Envelope>,
        snapshots: watch::Sender<AppState>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let Session {
            config,
            mut simulator,
            backend,
            speech,
            mut state,
        } = self;
        let (completion_tx, mut completions) = mpsc::unbounded_channel();
        let mut executor = EffectExecutor {
            config: &config,
            backend,
            speech,
            completions: completion_tx,
            pending: PendingSteps::default(),
        };
        let mut limiter = RateLimiter::new(config.effective_tick());
        info!(
            tick_ms = duration_to_millis(config.effective_tick()),
            time_scale = config.time_scale,
            "session started"
        );
        executor.run_all(state.boot());

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!("session shutdown signal received");
                    break;
                }
                _ = limiter.tick() => {
                    let effects = state.on_tick(&mut simulator);
                    executor.run_all(effects);
                    snapshots.send_replace(state.clone());
                }
                Some(envelope) = commands.recv() => {
                    debug!(command = ?envelope.command, "operator command");
                    let outcome = envelope.command.apply(&mut state).map(|effects| executor.run_all(effects));
                    // The snapshot must show the command before `send` returns.
                    snapshots.send_replace(state.clone());
                    let _ = envelope.reply.send(outcome);
                }
                Some(completion) = completions.recv() => {
                    let effects = match completion {
                        Completion::Step { epoch, step } => state.handle_step(epoch, step),
                        Completion::Reply { epoch, text } => state.apply_reply(epoch, text),
                    };
                    executor.run_all(effects);
                    snapshots.send_replace(state.clone());
                }
            }
        }

        let aborted = executor.pending.abort_all();
        info!(aborted, "session stopped");
    }
}

struct EffectExecutor<'a> {
    config: &'a SimulationConfig,
    backend: Arc<dyn AssistantBackend>,
    speech: Option<SpeechPipeline>,
    completions: mpsc::UnboundedSender<Completion>,
    pending: PendingSteps,
}

impl EffectExecutor<'_> {
    fn run_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Schedule { delay, step, epoch } => {
                let delay = self.config.scaled(delay);
                let tx = self.completions.clone();
                self.pending.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Completion::Step { epoch, step });
                });
            }
            Effect::RequestReply { request, epoch } => {
                let backend = self.backend.clone();
                let tx = self.completions.clone();
                tokio::spawn(async move {
                    let text = backend.reply(request).await;
                    let _ = tx.send(Completion::Reply { epoch, text });
                });
            }
            Effect::Speak(text) => {
                if let Some(speech) = self.speech.clone() {
                    tokio::spawn(async move {
                        speech.speak(&text).await;
                    });
                }
            }
            Effect::CancelPending => {
                let aborted = self.pending.abort_all();
                debug!(aborted, "pending steps cancelled");
            }
        }
    }
}

/// Handle to a running session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<AppState>,
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Submit a command and wait until the owner task has applied it.
    pub async fn send(&self, command: Command) -> crate::errors::Result<()> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| CommandError::SessionClosed)?;
        outcome.await.map_err(|_| CommandError::SessionClosed)?
    }

    /// Latest published state.
    pub fn snapshot(&self) -> AppState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.snapshots.clone()
    }

    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task.await?;
        info!("session shutdown complete");
        Ok(())
    }
}
