//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Shared primitives and utilities for the core runtime."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
//! Core shared primitives for the AURA workspace.
//! This crate exposes configuration loading, tracing bootstrap, and the
//! wall-clock helpers used to stamp dialogue entries.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{AppConfig, AssistantConfig, LoadedAppConfig, LoggingConfig, SimulationConfig};
pub use logging::{init_tracing, LogFormat};
pub use time::{clock_label, fixed_stamp, local_time_of_day};
