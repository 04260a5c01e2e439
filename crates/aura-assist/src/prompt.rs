//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::fmt::Write as _;

use aura_sim::{ComponentHealthSet, TelemetrySnapshot};
use serde::Serialize;

/// Free-text question plus the vehicle context it is asked in.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub telemetry: TelemetrySnapshot,
    pub health: ComponentHealthSet,
}

/// Build the system instruction that grounds the model in live vehicle data.
pub fn system_instruction(telemetry: &TelemetrySnapshot, health: &ComponentHealthSet) -> String {
    let t = telemetry.rounded();
    let mut out = String::from(
        "You are AURA, an agentic connected-vehicle assistant. You coordinate JEEVAH \
         (driver health and safety), PRAVAHA (component lifecycle and recycling) and \
         TATVA (diagnostics). Answer briefly and in a calm, helpful tone.\n\n",
    );
    out.push_str("Current vehicle telemetry:\n");
    let _ = writeln!(out, "- Battery voltage: {:.2} V (healthy range 12.6-14.4 V)", t.voltage_v);
    let _ = writeln!(out, "- Engine temperature: {:.0} C (normal around 90 C)", t.engine_temp_c);
    let _ = writeln!(out, "- Engine speed: {:.0} rpm", t.rpm);
    let _ = writeln!(out, "- Vehicle speed: {:.0} km/h", t.speed_kph);
    let _ = writeln!(out, "- Emission score: {:.0}/100", t.emission_score);
    let _ = writeln!(out, "- Eco score: {:.0}/100", t.eco_score);
    let _ = writeln!(out, "- Cabin temperature: {:.1} C", t.cabin_temp_c);
    out.push_str("\nDriver biometrics:\n");
    let _ = writeln!(out, "- Fatigue: {:.0}% (warning above 75%)", t.fatigue_pct);
    let _ = writeln!(out, "- Heart rate: {:.0} bpm", t.heart_rate_bpm);
    let _ = writeln!(out, "- Stress: {:.0}%", t.stress_pct);
    out.push_str("\nComponent health:\n");
    for (component, pct) in health.iter() {
        let _ = writeln!(out, "- {}: {:.0}%", component.label(), pct);
    }
    out.push_str(
        "\nIf any component is below 30%, recommend having it checked. \
         If fatigue is high, suggest taking a break.",
    );
    out
}
