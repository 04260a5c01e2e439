//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Simulation runtime helpers and scenario engines."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Closed interval a telemetry field is kept inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const VOLTAGE_RANGE: FieldRange = FieldRange::new(11.0, 14.5);
pub const ENGINE_TEMP_RANGE: FieldRange = FieldRange::new(60.0, 120.0);
pub const RPM_RANGE: FieldRange = FieldRange::new(600.0, 6000.0);
pub const SPEED_RANGE: FieldRange = FieldRange::new(0.0, 120.0);
pub const PERCENT_RANGE: FieldRange = FieldRange::new(0.0, 100.0);
pub const HEART_RATE_RANGE: FieldRange = FieldRange::new(50.0, 130.0);
pub const CABIN_TEMP_RANGE: FieldRange = FieldRange::new(16.0, 28.0);

/// One tick worth of simulated vehicle and driver readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub voltage_v: f64,
    pub engine_temp_c: f64,
    pub rpm: f64,
    pub speed_kph: f64,
    pub emission_score: f64,
    pub fatigue_pct: f64,
    pub heart_rate_bpm: f64,
    pub stress_pct: f64,
    pub cabin_temp_c: f64,
    pub eco_score: f64,
}

impl TelemetrySnapshot {
    pub const NOMINAL_VOLTAGE_V: f64 = 13.5;

    /// Readings shown when the console starts or is reset.
    pub fn initial() -> Self {
        Self {
            voltage_v: Self::NOMINAL_VOLTAGE_V,
            engine_temp_c: 90.0,
            rpm: 2500.0,
            speed_kph: 65.0,
            emission_score: 95.0,
            fatigue_pct: 10.0,
            heart_rate_bpm: 72.0,
            stress_pct: 15.0,
            cabin_temp_c: 22.0,
            eco_score: 92.0,
        }
    }

    /// Force every field into its range.
    pub fn clamped(self) -> Self {
        Self {
            voltage_v: VOLTAGE_RANGE.clamp(self.voltage_v),
            engine_temp_c: ENGINE_TEMP_RANGE.clamp(self.engine_temp_c),
            rpm: RPM_RANGE.clamp(self.rpm),
            speed_kph: SPEED_RANGE.clamp(self.speed_kph),
            emission_score: PERCENT_RANGE.clamp(self.emission_score),
            fatigue_pct: PERCENT_RANGE.clamp(self.fatigue_pct),
            heart_rate_bpm: HEART_RATE_RANGE.clamp(self.heart_rate_bpm),
            stress_pct: PERCENT_RANGE.clamp(self.stress_pct),
            cabin_temp_c: CABIN_TEMP_RANGE.clamp(self.cabin_temp_c),
            eco_score: PERCENT_RANGE.clamp(self.eco_score),
        }
    }

    /// Display precision: voltage to 2 decimals, cabin temperature to 1,
    /// everything else to whole numbers.
    pub fn rounded(self) -> Self {
        Self {
            voltage_v: round_to(self.voltage_v, 2),
            engine_temp_c: self.engine_temp_c.round(),
            rpm: self.rpm.round(),
            speed_kph: self.speed_kph.round(),
            emission_score: self.emission_score.round(),
            fatigue_pct: self.fatigue_pct.round(),
            heart_rate_bpm: self.heart_rate_bpm.round(),
            stress_pct: self.stress_pct.round(),
            cabin_temp_c: round_to(self.cabin_temp_c, 1),
            eco_score: self.eco_score.round(),
        }
    }

    /// True when every field sits inside its documented range.
    pub fn within_bounds(&self) -> bool {
        VOLTAGE_RANGE.contains(self.voltage_v)
            && ENGINE_TEMP_RANGE.contains(self.engine_temp_c)
            && RPM_RANGE.contains(self.rpm)
            && SPEED_RANGE.contains(self.speed_kph)
            && PERCENT_RANGE.contains(self.emission_score)
            && PERCENT_RANGE.contains(self.fatigue_pct)
            && HEART_RATE_RANGE.contains(self.heart_rate_bpm)
            && PERCENT_RANGE.contains(self.stress_pct)
            && CABIN_TEMP_RANGE.contains(self.cabin_temp_c)
            && PERCENT_RANGE.contains(self.eco_score)
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
