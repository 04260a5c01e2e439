//! ---
//! aura_section: "03-logging"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Structured logging adapters and sinks."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Structured logging context shared by the simulation and the sequencer.

pub mod macros;

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Active scenario, if any.
    pub scenario: Option<&'a str>,
    /// Sequencer stage at the time of the event.
    pub stage: Option<&'a str>,
    /// Pseudo-agent that produced the event.
    pub agent: Option<&'a str>,
    /// Simulation tick counter.
    pub tick: Option<u64>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a scenario name.
    pub fn with_scenario(mut self, scenario: &'a str) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Attach a sequencer stage.
    pub fn with_stage(mut self, stage: &'a str) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Attach a pseudo-agent label.
    pub fn with_agent(mut self, agent: &'a str) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Attach a tick value.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }
}

/// Lifecycle outcome used when emitting scenario events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEventOutcome {
    /// A scenario or sequence began.
    Started,
    /// A scenario reached its terminal state.
    Resolved,
    /// The run was cut short (reset or rejected command).
    Aborted,
}

impl SystemEventOutcome {
    /// Stable lowercase label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemEventOutcome::Started => "started",
            SystemEventOutcome::Resolved => "resolved",
            SystemEventOutcome::Aborted => "aborted",
        }
    }
}

/// Emit a standardized scenario lifecycle event.
pub fn log_system_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: SystemEventOutcome,
) {
    let fallback = LogContext::default();
    let ctx = context.unwrap_or(&fallback);
    match outcome {
        SystemEventOutcome::Started | SystemEventOutcome::Resolved => tracing::info!(
            target: "aura::lifecycle",
            event,
            outcome = outcome.as_str(),
            scenario = ctx.scenario.unwrap_or(""),
            stage = ctx.stage.unwrap_or(""),
            agent = ctx.agent.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            message = %message
        ),
        SystemEventOutcome::Aborted => tracing::warn!(
            target: "aura::lifecycle",
            event,
            outcome = outcome.as_str(),
            scenario = ctx.scenario.unwrap_or(""),
            stage = ctx.stage.unwrap_or(""),
            agent = ctx.agent.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            message = %message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new()
            .with_scenario("alternator")
            .with_agent("diagnosis");
        aura_info!(context = ctx.clone(), "pattern identified");
        aura_debug!("tick {}", 3);
        aura_warn!(context = ctx, "speech failed: {}", "timeout");
    }

    #[test]
    fn context_builder_sets_fields() {
        let ctx = LogContext::new().with_stage("engaging").with_tick(9);
        assert_eq!(ctx.stage, Some("engaging"));
        assert_eq!(ctx.tick, Some(9));
        assert!(ctx.scenario.is_none());
    }

    #[test]
    fn system_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_scenario("fatigue");
        log_system_event(
            Some(&ctx),
            "scenario.start",
            "manual fault injection",
            SystemEventOutcome::Started,
        );
        log_system_event(
            None,
            "scenario.reset",
            "session reset",
            SystemEventOutcome::Aborted,
        );
        assert_eq!(SystemEventOutcome::Resolved.as_str(), "resolved");
    }
}
