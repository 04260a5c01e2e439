//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "01-bootstrap"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Simulation runtime module exports and shared types."
//! aura_version: "v0.1.0"
//! aura_owner: "tbd"
//! ---
//! Vehicle telemetry simulation for the AURA assistant.
//!
//! The simulator is a pure step function over [`TelemetrySnapshot`]; the session
//! runtime in `aura-core` decides when to call it.

pub mod degradation;
pub mod frames;
pub mod generator;
pub mod health;
pub mod scenario;

pub use degradation::HealthDegrader;
pub use frames::{FieldRange, TelemetrySnapshot};
pub use generator::{NoiseSource, SilentNoise, TelemetrySimulator, UniformNoise};
pub use health::{label_list, Component, ComponentHealthSet, ComponentSelection, FAILURE_THRESHOLD_PCT};
pub use scenario::Scenario;
