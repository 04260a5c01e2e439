//! ---
//! aura_section: "11-simulation"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Simulation runtime helpers and scenario engines."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Health below this percentage marks a component as end-of-life.
pub const FAILURE_THRESHOLD_PCT: f64 = 30.0;

/// Wear-prone vehicle components tracked by the lifecycle agent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Component {
    BrakePads,
    Battery,
    Tires,
    EngineOil,
    CatalyticConverter,
}

impl Component {
    pub fn label(self) -> &'static str {
        match self {
            Component::BrakePads => "Brake Pads",
            Component::Battery => "HV Battery",
            Component::Tires => "Tires",
            Component::EngineOil => "Engine Oil",
            Component::CatalyticConverter => "Cat. Converter",
        }
    }

    /// Recoverable material reported on the recycling hand-off.
    pub fn material(self) -> &'static str {
        match self {
            Component::BrakePads => "Ceramic Composite",
            Component::Battery => "Lithium & Cobalt",
            Component::Tires => "Vulcanized Rubber",
            Component::EngineOil => "Synthetic Hydrocarbons",
            Component::CatalyticConverter => "Platinum Group Metals",
        }
    }

    pub fn baseline_pct(self) -> f64 {
        match self {
            Component::BrakePads => 98.0,
            Component::Battery => 96.0,
            Component::Tires => 94.0,
            Component::EngineOil => 92.0,
            Component::CatalyticConverter => 99.0,
        }
    }
}

/// Health percentage for each of the five components, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealthSet {
    levels: IndexMap<Component, f64>,
}

impl ComponentHealthSet {
    pub fn baseline() -> Self {
        Self {
            levels: Component::iter().map(|c| (c, c.baseline_pct())).collect(),
        }
    }

    pub fn get(&self, component: Component) -> f64 {
        self.levels
            .get(&component)
            .copied()
            .unwrap_or_else(|| component.baseline_pct())
    }

    /// Set a level, clamped to 0..=100.
    pub fn set(&mut self, component: Component, pct: f64) {
        self.levels.insert(component, pct.clamp(0.0, 100.0));
    }

    pub fn reset(&mut self) {
        *self = Self::baseline();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        self.levels.iter().map(|(c, pct)| (*c, *pct))
    }

    /// Selected components currently below [`FAILURE_THRESHOLD_PCT`], in selection order.
    pub fn failing(&self, selection: &ComponentSelection) -> Vec<Component> {
        selection
            .iter()
            .filter(|c| self.get(*c) < FAILURE_THRESHOLD_PCT)
            .collect()
    }
}

impl Default for ComponentHealthSet {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Ordered multi-select used by the end-of-life picker. Keeps toggle order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSelection {
    picked: IndexSet<Component>,
}

impl ComponentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership. Returns true when the component is now selected.
    pub fn toggle(&mut self, component: Component) -> bool {
        if self.picked.shift_remove(&component) {
            false
        } else {
            self.picked.insert(component);
            true
        }
    }

    pub fn contains(&self, component: Component) -> bool {
        self.picked.contains(&component)
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Component> + '_ {
        self.picked.iter().copied()
    }

    /// Materials of every selected component, comma separated.
    pub fn materials(&self) -> String {
        self.iter()
            .map(Component::material)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Component> for ComponentSelection {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        Self {
            picked: iter.into_iter().collect(),
        }
    }
}

/// Human-readable list of component labels, comma separated.
pub fn label_list(components: &[Component]) -> String {
    components
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_matches_fleet_defaults() {
        let set = ComponentHealthSet::baseline();
        let levels: Vec<f64> = set.iter().map(|(_, pct)| pct).collect();
        assert_eq!(levels, vec![98.0, 96.0, 94.0, 92.0, 99.0]);
    }

    #[test]
    fn toggle_preserves_pick_order() {
        let mut selection = ComponentSelection::new();
        assert!(selection.toggle(Component::Tires));
        assert!(selection.toggle(Component::Battery));
        assert!(selection.toggle(Component::BrakePads));
        assert!(!selection.toggle(Component::Battery));
        let order: Vec<_> = selection.iter().collect();
        assert_eq!(order, vec![Component::Tires, Component::BrakePads]);
        assert_eq!(selection.materials(), "Vulcanized Rubber, Ceramic Composite");
    }

    #[test]
    fn failing_only_reports_selected_components() {
        let mut set = ComponentHealthSet::baseline();
        set.set(Component::Battery, 25.0);
        set.set(Component::EngineOil, 5.0);
        let selection: ComponentSelection = [Component::Battery, Component::Tires].into_iter().collect();
        assert_eq!(set.failing(&selection), vec![Component::Battery]);
        assert_eq!(label_list(&set.failing(&selection)), "HV Battery");
    }
}
