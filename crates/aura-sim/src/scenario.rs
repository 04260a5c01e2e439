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
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The three mutually exclusive narratives the console can inject.
///
/// The session holds an `Option<Scenario>`; `None` is nominal driving.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Scenario {
    /// Alternator degradation: voltage sags until the diagnosis agent steps in.
    Alternator,
    /// Driver drowsiness: biometrics climb until the Jeevah agent steps in.
    Fatigue,
    /// Selected components wear out until the Pravaha agent steps in.
    EndOfLife,
}

impl Scenario {
    /// Headline used on scenario buttons and in the status bar.
    pub fn title(self) -> &'static str {
        match self {
            Scenario::Alternator => "Alternator Fault",
            Scenario::Fatigue => "Driver Fatigue",
            Scenario::EndOfLife => "Component End-of-Life",
        }
    }

    /// Label shown on the accept button of the booking prompt.
    pub fn accept_label(self) -> &'static str {
        match self {
            Scenario::Alternator => "Yes, Book Diagnostic",
            Scenario::Fatigue => "Yes, Find Rest Stop",
            Scenario::EndOfLife => "Yes, Initiate Recycle",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_kebab_case_names() {
        assert_eq!(Scenario::from_str("end-of-life").unwrap(), Scenario::EndOfLife);
        assert_eq!(Scenario::Alternator.to_string(), "alternator");
        assert!(Scenario::from_str("meltdown").is_err());
    }

    #[test]
    fn serde_uses_same_names() {
        let json = serde_json::to_string(&Scenario::EndOfLife).unwrap();
        assert_eq!(json, "\"end-of-life\"");
    }
}
