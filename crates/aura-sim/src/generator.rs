//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Simulation runtime helpers and scenario engines."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use rand::prelude::*;
use rand_distr::Uniform;
use tracing::trace;

use crate::frames::TelemetrySnapshot;
use crate::scenario::Scenario;

const CRUISE_SPEED_KPH: f64 = 65.0;
const LIMP_SPEED_KPH: f64 = 20.0;
const IDLE_RPM: f64 = 800.0;
const RPM_PER_KPH: f64 = 40.0;
const ALTERNATOR_DROP_V: f64 = 0.05;
const ALTERNATOR_FLOOR_V: f64 = 11.2;
const CABIN_SETPOINT_C: f64 = 22.0;

/// Source of bounded noise. `sample(a)` returns a value in `[-a, a]`.
pub trait NoiseSource {
    fn sample(&mut self, amplitude: f64) -> f64;
}

/// Seedable uniform noise used by the live console.
#[derive(Debug)]
pub struct UniformNoise {
    rng: StdRng,
    unit: Uniform<f64>,
}

impl UniformNoise {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            unit: Uniform::new_inclusive(-1.0, 1.0),
        }
    }
}

impl NoiseSource for UniformNoise {
    fn sample(&mut self, amplitude: f64) -> f64 {
        self.unit.sample(&mut self.rng) * amplitude
    }
}

/// Noise-free source; makes every step exactly reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNoise;

impl NoiseSource for SilentNoise {
    fn sample(&mut self, _amplitude: f64) -> f64 {
        0.0
    }
}

/// Advances vehicle and driver telemetry one tick at a time.
#[derive(Debug)]
pub struct TelemetrySimulator<N = UniformNoise> {
    noise: N,
    ticks: u64,
}

impl TelemetrySimulator<UniformNoise> {
    /// Build a simulator, seeded when `seed` is given and entropy-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let noise = match seed {
            Some(seed) => UniformNoise::seeded(seed),
            None => UniformNoise::from_entropy(),
        };
        Self::with_noise(noise)
    }
}

impl<N: NoiseSource> TelemetrySimulator<N> {
    pub fn with_noise(noise: N) -> Self {
        Self { noise, ticks: 0 }
    }

    /// Number of steps taken so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Compute the next snapshot from the previous one and the active scenario.
    pub fn step(&mut self, prev: &TelemetrySnapshot, scenario: Option<Scenario>) -> TelemetrySnapshot {
        self.ticks += 1;
        let mut next = *prev;

        let target_speed = if scenario.is_some() {
            LIMP_SPEED_KPH
        } else {
            CRUISE_SPEED_KPH
        };
        next.speed_kph =
            prev.speed_kph + (target_speed - prev.speed_kph) * 0.1 + self.noise.sample(1.0);

        let target_rpm = IDLE_RPM + next.speed_kph * RPM_PER_KPH;
        next.rpm = prev.rpm + (target_rpm - prev.rpm) * 0.1 + self.noise.sample(25.0);

        next.voltage_v = match scenario {
            Some(Scenario::Alternator) => (prev.voltage_v - ALTERNATOR_DROP_V).max(ALTERNATOR_FLOOR_V),
            _ => TelemetrySnapshot::NOMINAL_VOLTAGE_V + self.noise.sample(0.1),
        };

        let target_temp = match scenario {
            Some(Scenario::Alternator) => 105.0,
            Some(Scenario::Fatigue) => 85.0,
            _ => 90.0,
        };
        next.engine_temp_c =
            prev.engine_temp_c + (target_temp - prev.engine_temp_c) * 0.05 + self.noise.sample(0.25);

        match scenario {
            Some(Scenario::Fatigue) => {
                next.fatigue_pct = (prev.fatigue_pct + 1.5).min(100.0);
                next.heart_rate_bpm = (prev.heart_rate_bpm + 0.5).min(110.0);
                next.stress_pct = (prev.stress_pct + 0.8).min(85.0);
                next.eco_score = (prev.eco_score - 0.5).max(60.0);
            }
            Some(Scenario::EndOfLife) => {
                next.eco_score = (prev.eco_score - 0.8).max(65.0);
                next.fatigue_pct = (prev.fatigue_pct - 0.2).max(10.0);
                next.stress_pct = (prev.stress_pct - 0.5).max(15.0);
            }
            _ => {
                next.fatigue_pct = (prev.fatigue_pct - 0.5).max(10.0);
                next.heart_rate_bpm = (prev.heart_rate_bpm - 0.5).max(72.0) + self.noise.sample(1.0);
                next.stress_pct = (prev.stress_pct - 0.5).max(15.0);
                next.eco_score = (prev.eco_score + 0.2).min(98.0);
            }
        }

        next.cabin_temp_c = CABIN_SETPOINT_C + self.noise.sample(0.25);

        let next = next.clamped();
        trace!(
            target: "aura::telemetry",
            tick = self.ticks,
            scenario = scenario.map(|s| s.as_ref().to_owned()).unwrap_or_default(),
            voltage = next.voltage_v,
            fatigue = next.fatigue_pct,
            speed = next.speed_kph,
            "telemetry step"
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_stay_in_bounds_under_every_scenario() {
        let mut sim = TelemetrySimulator::new(Some(42));
        for scenario in [None, Some(Scenario::Alternator), Some(Scenario::Fatigue), Some(Scenario::EndOfLife)] {
            let mut snapshot = TelemetrySnapshot::initial();
            for _ in 0..500 {
                snapshot = sim.step(&snapshot, scenario);
                assert!(snapshot.within_bounds(), "{snapshot:?} escaped bounds under {scenario:?}");
            }
        }
        assert_eq!(sim.ticks(), 2000);
    }

    #[test]
    fn alternator_voltage_drops_to_floor() {
        let mut sim = TelemetrySimulator::with_noise(SilentNoise);
        let mut snapshot = TelemetrySnapshot::initial();
        snapshot = sim.step(&snapshot, Some(Scenario::Alternator));
        assert!((snapshot.voltage_v - 13.45).abs() < 1e-9);
        for _ in 0..100 {
            snapshot = sim.step(&snapshot, Some(Scenario::Alternator));
        }
        assert_eq!(snapshot.voltage_v, 11.2);
    }

    #[test]
    fn any_scenario_slows_toward_limp_speed() {
        let mut sim = TelemetrySimulator::with_noise(SilentNoise);
        let mut snapshot = TelemetrySnapshot::initial();
        for _ in 0..80 {
            snapshot = sim.step(&snapshot, Some(Scenario::EndOfLife));
        }
        assert!(snapshot.speed_kph <= 25.0);
        assert!(snapshot.rpm < 2000.0);
    }

    #[test]
    fn fatigue_climbs_past_alert_threshold() {
        let mut sim = TelemetrySimulator::with_noise(SilentNoise);
        let mut snapshot = TelemetrySnapshot::initial();
        let mut ticks = 0;
        while snapshot.fatigue_pct <= 80.0 {
            snapshot = sim.step(&snapshot, Some(Scenario::Fatigue));
            ticks += 1;
            assert!(ticks < 200, "fatigue never crossed the threshold");
        }
        assert!(snapshot.heart_rate_bpm <= 110.0);
        assert!(snapshot.stress_pct <= 85.0);
        assert!(snapshot.eco_score >= 60.0);
    }

    #[test]
    fn nominal_driving_recovers_biometrics() {
        let mut sim = TelemetrySimulator::with_noise(SilentNoise);
        let mut snapshot = TelemetrySnapshot {
            fatigue_pct: 60.0,
            stress_pct: 50.0,
            eco_score: 70.0,
            ..TelemetrySnapshot::initial()
        };
        for _ in 0..200 {
            snapshot = sim.step(&snapshot, None);
        }
        assert_eq!(snapshot.fatigue_pct, 10.0);
        assert_eq!(snapshot.stress_pct, 15.0);
        assert!((snapshot.eco_score - 98.0).abs() < 1e-9);
        assert_eq!(snapshot.voltage_v, 13.5);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = TelemetrySimulator::new(Some(7));
        let mut b = TelemetrySimulator::new(Some(7));
        let start = TelemetrySnapshot::initial();
        assert_eq!(a.step(&start, None), b.step(&start, None));
    }
}
