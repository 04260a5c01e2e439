//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Session state, scripted agents and runtime lifecycle."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::collections::VecDeque;

use aura_common::time::clock_label;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Newest system-log entries kept on screen.
pub const SYSTEM_LOG_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Speaker {
    Assistant,
    User,
}

/// One chat line with its time-of-day stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub speaker: Speaker,
    pub text: String,
    pub stamp: NaiveTime,
}

impl DialogueEntry {
    pub fn assistant(text: impl Into<String>, stamp: NaiveTime) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
            stamp,
        }
    }

    pub fn user(text: impl Into<String>, stamp: NaiveTime) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            stamp,
        }
    }

    pub fn time_label(&self) -> String {
        clock_label(self.stamp)
    }
}

/// Append-only chat history, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<DialogueEntry>,
}

impl Transcript {
    /// Start over with a single assistant line.
    pub fn restart_with(entry: DialogueEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    pub fn push(&mut self, entry: DialogueEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DialogueEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&DialogueEntry> {
        self.entries.last()
    }

    pub fn assistant_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.speaker == Speaker::Assistant)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLogEntry {
    pub agent: String,
    pub action: String,
    pub stamp: NaiveTime,
}

/// Ring of the newest agent actions, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLog {
    entries: VecDeque<SystemLogEntry>,
}

impl SystemLog {
    pub fn record(&mut self, agent: impl Into<String>, action: impl Into<String>, stamp: NaiveTime) {
        self.entries.push_front(SystemLogEntry {
            agent: agent.into(),
            action: action.into(),
            stamp,
        });
        self.entries.truncate(SYSTEM_LOG_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemLogEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&SystemLogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_common::time::fixed_stamp;

    #[test]
    fn system_log_keeps_five_newest_first() {
        let mut log = SystemLog::default();
        for i in 0..7 {
            log.record("System", format!("event {i}"), fixed_stamp(9, i));
        }
        assert_eq!(log.len(), SYSTEM_LOG_CAPACITY);
        assert_eq!(log.newest().map(|e| e.action.as_str()), Some("event 6"));
        assert_eq!(log.iter().last().map(|e| e.action.as_str()), Some("event 2"));
    }

    #[test]
    fn transcript_restart_drops_history() {
        let mut transcript = Transcript::restart_with(DialogueEntry::assistant("hi", fixed_stamp(9, 0)));
        transcript.push(DialogueEntry::user("hello", fixed_stamp(9, 1)));
        assert_eq!(transcript.len(), 2);
        let fresh = Transcript::restart_with(DialogueEntry::assistant("again", fixed_stamp(9, 30)));
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh.entries()[0].time_label(), "09:30 AM");
    }
}
