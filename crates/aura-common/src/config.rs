//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Shared primitives and utilities for the core runtime."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;
use url::Url;

use crate::logging::LogFormat;

/// Secondary variable consulted when the configured credential variable is unset.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

fn default_tick_interval() -> Duration {
    Duration::from_millis(1000)
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_owned()
}

fn default_base_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/").expect("valid default base url")
}

fn default_chat_model() -> String {
    "gemini-2.5-flash".to_owned()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_owned()
}

fn default_voice() -> String {
    "Kore".to_owned()
}

fn default_sample_rate() -> u32 {
    24_000
}

fn default_speech_enabled() -> bool {
    true
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("target/speech")
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_log_stdout() -> bool {
    true
}

/// Primary configuration object for the AURA console and headless runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "AURA_CONFIG";

    /// Load configuration from disk, respecting the `AURA_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Some(loaded) = Self::load_from_env_or_candidates(candidates)? {
            return Ok(loaded);
        }
        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Like [`AppConfig::load_with_source`] but falls back to built-in defaults
    /// when none of the candidates exist. Parse and validation errors still fail.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        Ok(Self::load_from_env_or_candidates(candidates)?.unwrap_or(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        }))
    }

    fn load_from_env_or_candidates<P: AsRef<Path>>(
        candidates: &[P],
    ) -> Result<Option<LoadedAppConfig>> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(Some(LoadedAppConfig {
                    config,
                    source: Some(path),
                }));
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(Some(LoadedAppConfig {
                    config,
                    source: Some(path),
                }));
            }
        }
        Ok(None)
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.assistant.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Tick cadence and timing controls for the simulation loop and the sequencer timers.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(rename = "tick_interval_ms", default = "default_tick_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub tick_interval: Duration,
    /// Seed for the telemetry noise generator. Entropy-seeded when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Multiplier applied to every sequencer delay and to the tick interval.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl SimulationConfig {
    /// Smallest and largest accepted `time_scale`.
    pub const TIME_SCALE_RANGE: (f64, f64) = (1e-3, 1e3);

    /// Apply the configured time scale to a nominal delay. Saturates at
    /// `Duration::MAX` instead of overflowing.
    pub fn scaled(&self, nominal: Duration) -> Duration {
        Duration::try_from_secs_f64(nominal.as_secs_f64() * self.time_scale)
            .unwrap_or(Duration::MAX)
    }

    /// Effective tick period after scaling.
    pub fn effective_tick(&self) -> Duration {
        self.scaled(self.tick_interval)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(anyhow!("simulation tick_interval_ms must be greater than zero"));
        }
        let (min, max) = Self::TIME_SCALE_RANGE;
        if !(min..=max).contains(&self.time_scale) {
            return Err(anyhow!(
                "simulation time_scale must be between {} and {} (got {})",
                min,
                max,
                self.time_scale
            ));
        }
        if self.effective_tick().is_zero() {
            return Err(anyhow!(
                "simulation time_scale {} scales tick_interval_ms to zero",
                self.time_scale
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
            random_seed: None,
            time_scale: default_time_scale(),
        }
    }
}

/// Settings for the generative chat and speech synthesis bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: u32,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

impl AssistantConfig {
    /// Resolve the API credential from the configured variable, then `API_KEY`.
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.chat_model.trim().is_empty() || self.tts_model.trim().is_empty() {
            return Err(anyhow!("assistant chat_model and tts_model must not be empty"));
        }
        if self.sample_rate_hz == 0 {
            return Err(anyhow!("assistant sample_rate_hz must be greater than zero"));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(anyhow!(
                "assistant base_url {} cannot be used as a base url",
                self.base_url
            ));
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            sample_rate_hz: default_sample_rate(),
            speech_enabled: default_speech_enabled(),
            audio_dir: default_audio_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Mirror events to stdout. The terminal UI forces this off.
    #[serde(default = "default_log_stdout")]
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            stdout: default_log_stdout(),
        }
    }
}
