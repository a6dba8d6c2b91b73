//! Logging System
//!
//! Structured logging using the `tracing` crate. The library only emits events;
//! binaries call [`init_logging`] once to install a subscriber.

use crate::error::DriveError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Resolve the log file path with precedence: DRIVE_LOG_FILE env, config file, default.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, DriveError> {
    if let Ok(env_path) = std::env::var("DRIVE_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf, DriveError> {
    let project_dirs =
        directories::ProjectDirs::from("", "blossom-drive", "blossom-drive").ok_or_else(|| {
            DriveError::Config("Could not determine platform directories for log file".to_string())
        })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.cache_dir())
        .to_path_buf();
    Ok(dir.join("drive.log"))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Output destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (DRIVE_LOG, DRIVE_LOG_FORMAT, DRIVE_LOG_OUTPUT, DRIVE_LOG_FILE)
/// 2. Configuration
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), DriveError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| DriveError::Config(format!("Failed to install logger: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let json = determine_format(config)? == "json";
    let output = determine_output(config)?;
    let use_color = !json && !output.file && config.map(|c| c.color).unwrap_or(true);
    let writer = build_writer(output, config.and_then(|c| c.file.clone()))?;

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(use_color)
        .with_writer(writer);

    let result = if json {
        Registry::default().with(filter).with(layer.json()).try_init()
    } else {
        Registry::default().with(filter).with(layer).try_init()
    };
    result.map_err(|e| DriveError::Config(format!("Failed to install logger: {}", e)))
}

fn build_writer(
    output: OutputDestinations,
    config_file: Option<PathBuf>,
) -> Result<BoxMakeWriter, DriveError> {
    if !output.file {
        return Ok(match (output.stdout, output.stderr) {
            (true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            (true, false) => BoxMakeWriter::new(std::io::stdout),
            (false, true) => BoxMakeWriter::new(std::io::stderr),
            (false, false) => BoxMakeWriter::new(std::io::sink),
        });
    }

    let log_file = resolve_log_file_path(config_file)?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DriveError::Config(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            DriveError::Config(format!("Failed to open log file {:?}: {}", log_file, e))
        })?;
    let file = std::sync::Arc::new(file);
    if output.stderr {
        Ok(BoxMakeWriter::new(file.and(std::io::stderr)))
    } else {
        Ok(BoxMakeWriter::new(file))
    }
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, DriveError> {
    if let Ok(filter) = EnvFilter::try_from_env("DRIVE_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);
    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| DriveError::Config(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, DriveError> {
    if let Ok(format) = std::env::var("DRIVE_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(DriveError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Determine output destinations from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, DriveError> {
    if let Ok(output) = std::env::var("DRIVE_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    let output = config.map(|c| c.output.as_str()).unwrap_or("stderr");
    parse_output_destinations(output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, DriveError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        _ => {
            return Err(DriveError::Config(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, "text");
        assert_eq!(config.output, "stderr");
        assert_eq!(config.file, None);
    }

    #[test]
    fn test_parse_output_destinations() {
        let out = parse_output_destinations("stdout").unwrap();
        assert_eq!((out.stdout, out.stderr, out.file), (true, false, false));

        let out = parse_output_destinations("file+stderr").unwrap();
        assert_eq!((out.stdout, out.stderr, out.file), (false, true, true));

        assert!(parse_output_destinations("carrier-pigeon").is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        if std::env::var("DRIVE_LOG_FORMAT").is_err() {
            assert!(determine_format(Some(&config)).is_err());
        }
    }

    #[test]
    fn test_resolve_log_file_path_config_when_env_unset() {
        if std::env::var("DRIVE_LOG_FILE").is_err() {
            let path = resolve_log_file_path(Some(PathBuf::from("/tmp/drive-config.log"))).unwrap();
            assert_eq!(path, PathBuf::from("/tmp/drive-config.log"));
        }
    }

    #[test]
    fn test_resolve_log_file_path_default_fallback() {
        if std::env::var("DRIVE_LOG_FILE").is_err() {
            let path = resolve_log_file_path(None).unwrap();
            assert!(path.ends_with("drive.log"));
        }
    }
}
