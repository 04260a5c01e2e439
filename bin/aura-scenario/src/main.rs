//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "01-bootstrap"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Headless runner that plays one scenario end to end."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
mod driver;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use aura_assist::{GeminiClient, NullSink, SpeechPipeline, SpeechSink, WavDirectorySink};
use aura_common::{clock_label, init_tracing, AppConfig};
use aura_core::{Answer, AppState, ServiceSlot, Session, Speaker};
use aura_sim::{Component, Scenario};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::driver::{drive, RunPlan};

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["configs/aura.toml", "aura.toml"];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnswerArg {
    Accept,
    Decline,
}

impl From<AnswerArg> for Answer {
    fn from(arg: AnswerArg) -> Self {
        match arg {
            AnswerArg::Accept => Answer::Accept,
            AnswerArg::Decline => Answer::Decline,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SlotArg {
    TodayAfternoon,
    TodayEvening,
    TomorrowMorning,
    TomorrowAfternoon,
}

impl From<SlotArg> for ServiceSlot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::TodayAfternoon => ServiceSlot::TodayAfternoon,
            SlotArg::TodayEvening => ServiceSlot::TodayEvening,
            SlotArg::TomorrowMorning => ServiceSlot::TomorrowMorning,
            SlotArg::TomorrowAfternoon => ServiceSlot::TomorrowAfternoon,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run one AURA scenario headless with scripted operator answers",
    long_about = None
)]
struct Cli {
    /// Scenario to inject: alternator, fatigue or end-of-life
    #[arg(long)]
    scenario: Scenario,

    /// Component to mark end-of-life (repeatable), e.g. battery, tires, brake-pads
    #[arg(long = "component")]
    components: Vec<Component>,

    /// Answer given to the booking prompt
    #[arg(long, value_enum, default_value_t = AnswerArg::Accept)]
    answer: AnswerArg,

    /// Service slot picked after accepting
    #[arg(long, value_enum, default_value_t = SlotArg::TodayAfternoon)]
    slot: SlotArg,

    /// Multiplier applied to the tick and every scripted delay
    #[arg(long, default_value_t = 0.05)]
    time_scale: f64,

    /// Seed for telemetry noise
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many wall-clock seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Configuration file (defaults to configs/aura.toml, then aura.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write synthesized speech clips to the configured audio directory
    #[arg(long)]
    speak: bool,

    /// Mirror log events to stdout
    #[arg(long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct RunReport<'a> {
    scenario: Scenario,
    transcript: &'a [aura_core::DialogueEntry],
    system_log: Vec<&'a aura_core::SystemLogEntry>,
    telemetry: aura_sim::TelemetrySnapshot,
    health: &'a aura_sim::ComponentHealthSet,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(&[path])?,
        None => AppConfig::load_or_default(&DEFAULT_CONFIG_CANDIDATES)?.config,
    };
    config.simulation.time_scale = cli.time_scale;
    if cli.seed.is_some() {
        config.simulation.random_seed = cli.seed;
    }
    config.assistant.speech_enabled = cli.speak;
    config.logging.stdout = cli.verbose;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing("aura-scenario", &config.logging)?;

    let client = Arc::new(
        GeminiClient::from_config(&config.assistant).context("building assistant client")?,
    );
    let sink: Arc<dyn SpeechSink> = if cli.speak {
        Arc::new(
            WavDirectorySink::create(config.assistant.audio_dir.clone())
                .await
                .context("preparing speech output directory")?,
        )
    } else {
        Arc::new(NullSink)
    };
    let speech = SpeechPipeline::new(
        client.clone(),
        sink,
        config.assistant.sample_rate_hz,
        cli.speak,
    );
    let handle = Session::new(config.simulation.clone(), client)
        .with_speech(speech)
        .spawn();

    let plan = RunPlan {
        scenario: cli.scenario,
        components: cli.components.clone(),
        answer: cli.answer.into(),
        slot: cli.slot.into(),
    };
    let outcome = drive(&handle, &plan, Duration::from_secs(cli.timeout_secs)).await;
    handle.shutdown().await?;
    let state = outcome?;

    match cli.format {
        OutputFormat::Text => print_text(cli.scenario, &state),
        OutputFormat::Json => print_json(cli.scenario, &state)?,
    }
    Ok(())
}

fn print_text(scenario: Scenario, state: &AppState) {
    println!("== {} ==", scenario.title());
    for entry in state.transcript().entries() {
        let who = match entry.speaker {
            Speaker::Assistant => "AURA",
            Speaker::User => "You",
        };
        println!("[{}] {}: {}", entry.time_label(), who, entry.text);
    }
    println!();
    println!("-- system log (newest first) --");
    for entry in state.system_log().iter() {
        println!("{}  {}: {}", clock_label(entry.stamp), entry.agent, entry.action);
    }
    println!();
    let t = state.telemetry().rounded();
    println!(
        "voltage {:.2} V  fatigue {:.0}%  eco {:.0}",
        t.voltage_v, t.fatigue_pct, t.eco_score
    );
    let health = state
        .health()
        .iter()
        .map(|(component, pct)| format!("{} {:.0}%", component.label(), pct))
        .collect::<Vec<_>>()
        .join(", ");
    println!("health: {health}");
}

fn print_json(scenario: Scenario, state: &AppState) -> Result<()> {
    let report = RunReport {
        scenario,
        transcript: state.transcript().entries(),
        system_log: state.system_log().iter().collect(),
        telemetry: state.telemetry().rounded(),
        health: state.health(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
