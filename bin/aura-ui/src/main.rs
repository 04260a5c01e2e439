//! ---
//! aura_section: "06-presentation"
//! aura_subsection: "binary"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Terminal dashboard launcher for the AURA simulator."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
mod app;
mod view;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use aura_assist::{GeminiClient, NullSink, SpeechPipeline, SpeechSink, WavDirectorySink};
use aura_common::{init_tracing, AppConfig};
use aura_core::{Session, SessionHandle};
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::app::{App, Intent};

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["configs/aura.toml", "aura.toml"];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Terminal console for the AURA connected-vehicle assistant simulator"
)]
struct Cli {
    /// Configuration file (defaults to configs/aura.toml, then aura.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Multiplier applied to the tick and every scripted delay
    #[arg(long)]
    time_scale: Option<f64>,
    /// Seed for telemetry noise
    #[arg(long)]
    seed: Option<u64>,
    /// Disable speech synthesis
    #[arg(long)]
    mute: bool,
    /// Redraw interval in milliseconds
    #[arg(long, default_value_t = 100)]
    refresh: u64,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let candidates: Vec<PathBuf> = match &cli.config {
        Some(path) => vec![path.clone()],
        None => DEFAULT_CONFIG_CANDIDATES.iter().map(PathBuf::from).collect(),
    };
    let mut config = if cli.config.is_some() {
        AppConfig::load(&candidates)?
    } else {
        AppConfig::load_or_default(&candidates)?.config
    };
    if let Some(scale) = cli.time_scale {
        config.simulation.time_scale = scale;
    }
    if cli.seed.is_some() {
        config.simulation.random_seed = cli.seed;
    }
    if cli.mute {
        config.assistant.speech_enabled = false;
    }
    config.logging.stdout = false;
    config.validate()?;
    Ok(config)
}

fn start_session(runtime: &Runtime, config: &AppConfig) -> Result<SessionHandle> {
    let client = Arc::new(
        GeminiClient::from_config(&config.assistant).context("building assistant client")?,
    );
    let sink: Arc<dyn SpeechSink> = if config.assistant.speech_enabled {
        match runtime.block_on(WavDirectorySink::create(config.assistant.audio_dir.clone())) {
            Ok(sink) => Arc::new(sink),
            Err(err) => {
                warn!(error = %err, "speech output directory unavailable; speech muted");
                Arc::new(NullSink)
            }
        }
    } else {
        Arc::new(NullSink)
    };
    let speech = SpeechPipeline::new(
        client.clone(),
        sink,
        config.assistant.sample_rate_hz,
        config.assistant.speech_enabled,
    );
    let _guard = runtime.enter();
    Ok(Session::new(config.simulation.clone(), client)
        .with_speech(speech)
        .spawn())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing("aura-ui", &config.logging)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let handle = start_session(&runtime, &config)?;
    info!(time_scale = config.simulation.time_scale, "dashboard starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let result = run_app(&mut terminal, &runtime, &handle, Duration::from_millis(cli.refresh.max(20)));
    cleanup_terminal(&mut terminal)?;
    runtime.block_on(handle.shutdown())?;
    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
    Ok(())
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    runtime: &Runtime,
    handle: &SessionHandle,
    refresh: Duration,
) -> Result<()> {
    let mut app = App::default();
    loop {
        let state = handle.snapshot();
        terminal.draw(|frame| view::draw(frame, &app, &state))?;
        if !event::poll(refresh)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match app.handle_key(key, &state) {
            Intent::Quit => break,
            Intent::Dispatch(command) => match runtime.block_on(handle.send(command)) {
                Ok(()) => app.status = None,
                Err(err) => app.status = Some(err.to_string()),
            },
            Intent::Idle => {}
        }
    }
    Ok(())
}
