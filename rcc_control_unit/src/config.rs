//! TOML configuration loader with validation.
//!
//! Loads a [`ControllerConfig`] and runs its bounds checks so callers never
//! see a parsed-but-invalid configuration.

use std::path::Path;

use rcc_common::config::{ConfigError, ConfigLoader};
use rcc_common::control_unit::config::ControllerConfig;
use tracing::info;

/// Load and validate a controller configuration file.
pub fn load_config(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let config = ControllerConfig::load(path)?;
    config.validate()?;
    info!(
        "Config OK: {} (feed={}ms, flip={}deg, feeding2={})",
        config.shared.service_name,
        config.cycle.feed_duration_ms,
        config.rotary.flip_angle,
        config.cycle.feeding2_enabled
    );
    Ok(config)
}

/// Parse and validate an in-memory TOML document.
pub fn load_config_from_str(content: &str) -> Result<ControllerConfig, ConfigError> {
    let config = ControllerConfig::from_toml_str(content)?;
    config.validate()?;
    Ok(config)
}
