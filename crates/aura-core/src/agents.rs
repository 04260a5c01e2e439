//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// Named flags the dashboard highlights while a scripted step runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PseudoAgent {
    Data,
    Diagnosis,
    Master,
    Engagement,
    Scheduling,
    Jeevah,
    Pravaha,
}

impl PseudoAgent {
    /// Label written into the system log.
    pub fn log_label(self) -> &'static str {
        match self {
            PseudoAgent::Data => "Data Agent",
            PseudoAgent::Diagnosis => "Diagnosis Agent",
            PseudoAgent::Master => "Master Agent",
            PseudoAgent::Engagement => "Engagement Agent",
            PseudoAgent::Scheduling => "Scheduling Agent",
            PseudoAgent::Jeevah => "AURA JEEVAH",
            PseudoAgent::Pravaha => "AURA PRAVAHA",
        }
    }
}

/// Active flag per pseudo-agent, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentActivity {
    flags: IndexMap<PseudoAgent, bool>,
}

impl AgentActivity {
    pub fn idle() -> Self {
        Self {
            flags: PseudoAgent::iter().map(|a| (a, false)).collect(),
        }
    }

    pub fn set(&mut self, agent: PseudoAgent, active: bool) {
        self.flags.insert(agent, active);
    }

    pub fn activate(&mut self, agent: PseudoAgent) {
        self.set(agent, true);
    }

    pub fn deactivate(&mut self, agent: PseudoAgent) {
        self.set(agent, false);
    }

    pub fn is_active(&self, agent: PseudoAgent) -> bool {
        self.flags.get(&agent).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PseudoAgent, bool)> + '_ {
        self.flags.iter().map(|(a, on)| (*a, *on))
    }

    pub fn any_active(&self) -> bool {
        self.flags.values().any(|on| *on)
    }
}

impl Default for AgentActivity {
    fn default() -> Self {
        Self::idle()
    }
}
