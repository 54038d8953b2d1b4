use crate::config::types::Settings;
use crate::config::validation::validate_settings;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to load, parse, or validate the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_trawl::config::load_config;
///
/// let settings = load_config(Path::new("trawl.toml")).unwrap();
/// println!("Delay: {}ms", settings.crawl.delay_ms);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates settings from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Settings> {
    let settings: Settings = toml::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}
