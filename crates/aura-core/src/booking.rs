//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which view the booking prompt is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingFlowStage {
    Prompt,
    SlotSelection,
}

/// Operator answer to the booking prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Answer {
    Accept,
    Decline,
}

impl Answer {
    /// Text echoed into the transcript on the operator's behalf.
    pub fn user_text(self) -> &'static str {
        match self {
            Answer::Accept => "Yes, proceed.",
            Answer::Decline => "Later",
        }
    }
}

/// Fixed service appointment slots offered by the scheduling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceSlot {
    TodayAfternoon,
    TodayEvening,
    TomorrowMorning,
    TomorrowAfternoon,
}

impl ServiceSlot {
    pub const ALL: [ServiceSlot; 4] = [
        ServiceSlot::TodayAfternoon,
        ServiceSlot::TodayEvening,
        ServiceSlot::TomorrowMorning,
        ServiceSlot::TomorrowAfternoon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ServiceSlot::TodayAfternoon => "Today, 4:00 PM",
            ServiceSlot::TodayEvening => "Today, 5:30 PM",
            ServiceSlot::TomorrowMorning => "Tomorrow, 9:00 AM",
            ServiceSlot::TomorrowAfternoon => "Tomorrow, 1:00 PM",
        }
    }
}

impl fmt::Display for ServiceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
