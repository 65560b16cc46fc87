//! Config file discovery, loading, and environment variable overlay.

use crate::{ChordConfig, ConfigError, OutputFormat};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Values present in one config file. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    pub format: Option<OutputFormat>,
    pub show_rejected: Option<bool>,
    pub color: Option<bool>,
    pub result: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Discover config files in standard locations, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli). Only returns files
/// that exist.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // System config
    let system = PathBuf::from("/etc/chordscope/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("chordscope/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    // Local override (current directory)
    let local = PathBuf::from("chordscope.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load one config layer from a TOML file.
pub fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

/// Parse a config layer from a TOML string.
///
/// Unknown keys are ignored. A known key with the wrong type is an error.
pub fn parse_toml(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let invalid = |key: &str, expected: &str| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("{} must be {}", key, expected),
    };

    let mut layer = ConfigLayer::default();

    if let Some(output) = table.get("output").and_then(|v| v.as_table()) {
        if let Some(v) = output.get("format") {
            let s = v.as_str().ok_or_else(|| invalid("output.format", "a string"))?;
            let format = s.parse::<OutputFormat>().map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            })?;
            layer.format = Some(format);
        }
        if let Some(v) = output.get("show_rejected") {
            layer.show_rejected =
                Some(v.as_bool().ok_or_else(|| invalid("output.show_rejected", "a boolean"))?);
        }
        if let Some(v) = output.get("color") {
            layer.color = Some(v.as_bool().ok_or_else(|| invalid("output.color", "a boolean"))?);
        }
    }

    if let Some(analysis) = table.get("analysis").and_then(|v| v.as_table()) {
        if let Some(v) = analysis.get("result") {
            let s = v.as_str().ok_or_else(|| invalid("analysis.result", "a string"))?;
            layer.result = Some(expand_path(s));
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level") {
            let s = v.as_str().ok_or_else(|| invalid("telemetry.log_level", "a string"))?;
            layer.log_level = Some(s.to_string());
        }
    }

    Ok(layer)
}

/// Apply `overlay` on top of `base`; values the overlay sets win.
pub fn merge_configs(mut base: ChordConfig, overlay: ConfigLayer) -> ChordConfig {
    if let Some(v) = overlay.format {
        base.output.format = v;
    }
    if let Some(v) = overlay.show_rejected {
        base.output.show_rejected = v;
    }
    if let Some(v) = overlay.color {
        base.output.color = v;
    }
    if let Some(v) = overlay.result {
        base.analysis.result = Some(v);
    }
    if let Some(v) = overlay.log_level {
        base.telemetry.log_level = v;
    }
    base
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut ChordConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |name| env::var(name).ok());
}

/// Apply overrides looked up through `var`. Unparseable values are skipped.
pub fn apply_overrides_from(
    config: &mut ChordConfig,
    sources: &mut ConfigSources,
    var: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = var("CHORDSCOPE_FORMAT") {
        if let Ok(format) = v.parse() {
            config.output.format = format;
            sources.env_overrides.push("CHORDSCOPE_FORMAT".to_string());
        }
    }
    if let Some(v) = var("CHORDSCOPE_SHOW_REJECTED") {
        if let Some(flag) = parse_bool(&v) {
            config.output.show_rejected = flag;
            sources.env_overrides.push("CHORDSCOPE_SHOW_REJECTED".to_string());
        }
    }
    // https://no-color.org
    if var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.output.color = false;
        sources.env_overrides.push("NO_COLOR".to_string());
    }
    if let Some(v) = var("CHORDSCOPE_RESULT") {
        config.analysis.result = Some(expand_path(&v));
        sources.env_overrides.push("CHORDSCOPE_RESULT".to_string());
    }

    // Telemetry
    if let Some(v) = var("CHORDSCOPE_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("CHORDSCOPE_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = var("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
