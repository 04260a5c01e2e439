//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Simulation runtime helpers and scenario engines."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use tracing::debug;

use crate::health::{ComponentHealthSet, ComponentSelection};
use crate::scenario::Scenario;

/// Wears down user-selected components while the end-of-life scenario runs.
#[derive(Debug, Clone, Copy)]
pub struct HealthDegrader {
    step_pct: f64,
    floor_pct: f64,
}

impl Default for HealthDegrader {
    fn default() -> Self {
        Self {
            step_pct: 2.5,
            floor_pct: 10.0,
        }
    }
}

impl HealthDegrader {
    /// Apply one tick of wear. Returns true when any level changed.
    pub fn degrade(
        &self,
        health: &mut ComponentHealthSet,
        selection: &ComponentSelection,
        scenario: Option<Scenario>,
    ) -> bool {
        if scenario != Some(Scenario::EndOfLife) {
            return false;
        }
        let mut changed = false;
        for component in selection.iter() {
            let current = health.get(component);
            let next = (current - self.step_pct).max(self.floor_pct).min(current);
            if next != current {
                health.set(component, next);
                changed = true;
                debug!(
                    target: "aura::degradation",
                    component = component.as_ref(),
                    from = current,
                    to = next,
                    "component wear applied"
                );
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Component;

    fn battery_and_tires() -> ComponentSelection {
        [Component::Battery, Component::Tires].into_iter().collect()
    }

    #[test]
    fn only_selected_components_degrade() {
        let degrader = HealthDegrader::default();
        let mut health = ComponentHealthSet::baseline();
        for _ in 0..10 {
            degrader.degrade(&mut health, &battery_and_tires(), Some(Scenario::EndOfLife));
        }
        assert_eq!(health.get(Component::Battery), 71.0);
        assert_eq!(health.get(Component::Tires), 69.0);
        assert_eq!(health.get(Component::BrakePads), 98.0);
        assert_eq!(health.get(Component::EngineOil), 92.0);
        assert_eq!(health.get(Component::CatalyticConverter), 99.0);
    }

    #[test]
    fn wear_stops_at_floor() {
        let degrader = HealthDegrader::default();
        let mut health = ComponentHealthSet::baseline();
        for _ in 0..100 {
            degrader.degrade(&mut health, &battery_and_tires(), Some(Scenario::EndOfLife));
        }
        assert_eq!(health.get(Component::Battery), 10.0);
        assert!(!degrader.degrade(&mut health, &battery_and_tires(), Some(Scenario::EndOfLife)));
    }

    #[test]
    fn other_scenarios_leave_health_alone() {
        let degrader = HealthDegrader::default();
        let mut health = ComponentHealthSet::baseline();
        assert!(!degrader.degrade(&mut health, &battery_and_tires(), Some(Scenario::Alternator)));
        assert!(!degrader.degrade(&mut health, &battery_and_tires(), None));
        assert_eq!(health, ComponentHealthSet::baseline());
    }
}
