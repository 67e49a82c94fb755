use papyrus::infrastructure::observability::{TracingConfig, configured_filter};
use papyrus::presentation::config::LoggingSettings;
use tracing_subscriber::filter::LevelFilter;

#[test]
fn given_default_config_when_created_then_environment_and_level_are_set() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
    assert_eq!(config.default_level, "info");
}

#[test]
fn given_logging_settings_when_building_config_then_level_and_format_are_taken_over() {
    let logging = LoggingSettings {
        level: "warn".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::from_settings("production", &logging);

    assert_eq!(config.environment, "production");
    assert_eq!(config.default_level, "warn");
    assert!(config.json_format);
}

#[test]
fn given_configured_level_when_building_filter_then_it_caps_every_target() {
    let config = TracingConfig {
        default_level: "warn".to_string(),
        ..TracingConfig::default()
    };

    let filter = configured_filter(&config);

    assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
}

#[test]
fn given_debug_level_when_building_filter_then_debug_is_allowed() {
    let config = TracingConfig {
        default_level: "debug".to_string(),
        ..TracingConfig::default()
    };

    assert_eq!(
        configured_filter(&config).max_level_hint(),
        Some(LevelFilter::DEBUG)
    );
}
