//! ---
//! aura_section: "03-logging"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Structured logging adapters and sinks."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
//! Context-aware wrappers around `tracing::event!`.

#[doc(hidden)]
#[macro_export]
macro_rules! __aura_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            scenario = ctx.scenario.unwrap_or(""),
            stage = ctx.stage.unwrap_or(""),
            agent = ctx.agent.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with AURA context.
#[macro_export]
macro_rules! aura_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__aura_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__aura_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with AURA context.
#[macro_export]
macro_rules! aura_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__aura_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__aura_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with AURA context.
#[macro_export]
macro_rules! aura_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__aura_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__aura_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}
