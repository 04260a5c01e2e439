//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Shared primitives and utilities for the core runtime."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::fs;
use std::time::Duration;

use aura_common::config::{AppConfig, AssistantConfig, SimulationConfig};
use aura_common::LogFormat;
use tempfile::tempdir;

#[test]
fn defaults_match_console_behaviour() {
    let config = AppConfig::default();
    assert_eq!(config.simulation.tick_interval, Duration::from_secs(1));
    assert_eq!(config.simulation.time_scale, 1.0);
    assert_eq!(config.assistant.chat_model, "gemini-2.5-flash");
    assert_eq!(config.assistant.voice, "Kore");
    assert_eq!(config.assistant.sample_rate_hz, 24_000);
    assert_eq!(config.logging.format, LogFormat::StructuredJson);
    config.validate().expect("defaults validate");
}

#[test]
fn partial_toml_fills_defaults() {
    let config: AppConfig = r#"
        [simulation]
        tick_interval_ms = 250
        random_seed = 7

        [logging]
        format = "pretty"
        stdout = false
    "#
    .parse()
    .expect("parse");
    assert_eq!(config.simulation.tick_interval, Duration::from_millis(250));
    assert_eq!(config.simulation.random_seed, Some(7));
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(!config.logging.stdout);
    assert_eq!(config.assistant.api_key_env, "GEMINI_API_KEY");
}

#[test]
fn zero_time_scale_is_rejected() {
    let err = "[simulation]\ntime_scale = 0.0\n"
        .parse::<AppConfig>()
        .expect_err("zero scale must fail");
    assert!(err.to_string().contains("time_scale"));
}

#[test]
fn out_of_range_time_scales_are_rejected() {
    for scale in ["1e-13", "1e20", "inf"] {
        let err = format!("[simulation]\ntime_scale = {scale}\n")
            .parse::<AppConfig>()
            .expect_err("scale outside the accepted range must fail");
        assert!(err.to_string().contains("time_scale"), "{scale}: {err}");
    }
}

#[test]
fn scale_that_zeroes_the_tick_is_rejected() {
    let config = SimulationConfig {
        tick_interval: Duration::from_nanos(1),
        time_scale: 0.01,
        ..SimulationConfig::default()
    };
    let err = config.validate().expect_err("zero effective tick must fail");
    assert!(err.to_string().contains("tick_interval_ms"));
}

#[test]
fn range_bounds_are_accepted_and_scaled_saturates() {
    let (min, max) = SimulationConfig::TIME_SCALE_RANGE;
    for scale in [min, max] {
        let config = SimulationConfig {
            time_scale: scale,
            ..SimulationConfig::default()
        };
        config.validate().unwrap();
        assert!(!config.effective_tick().is_zero());
    }
    let config = SimulationConfig {
        time_scale: max,
        ..SimulationConfig::default()
    };
    assert_eq!(config.scaled(Duration::MAX), Duration::MAX);
}

#[test]
fn scaled_delays_follow_time_scale() {
    let config: AppConfig = "[simulation]\ntime_scale = 0.5\n".parse().unwrap();
    assert_eq!(
        config.simulation.scaled(Duration::from_millis(1500)),
        Duration::from_millis(750)
    );
    assert_eq!(config.simulation.effective_tick(), Duration::from_millis(500));
}

#[test]
fn load_or_default_without_candidates_uses_defaults() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let loaded = AppConfig::load_or_default(&[missing]).unwrap();
    assert!(loaded.source.is_none());
}

#[test]
fn load_with_source_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aura.toml");
    fs::write(&path, "[assistant]\nvoice = \"Puck\"\n").unwrap();
    let loaded = AppConfig::load_with_source(&[path.clone()]).unwrap();
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    assert_eq!(loaded.config.assistant.voice, "Puck");
}

#[test]
fn configured_key_variable_takes_precedence() {
    let config = AssistantConfig {
        api_key_env: "AURA_TEST_PRIMARY_KEY".into(),
        ..AssistantConfig::default()
    };
    std::env::set_var("AURA_TEST_PRIMARY_KEY", "  primary-key ");
    assert_eq!(config.resolve_api_key().as_deref(), Some("primary-key"));
    std::env::remove_var("AURA_TEST_PRIMARY_KEY");
}
