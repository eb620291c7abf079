use crate::cli::args::Args;
use crate::cli::output::ConsoleWriter;
use crate::core::session::run_command;
use crate::domain::command::Command;
use crate::domain::config::{FileConfig, SessionConfig, DEFAULT_PROMPT, DEFAULT_TIMEOUT_MS};
use crate::domain::error::{McuxeqError, McuxeqResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use anyhow::Context;
use tracing::debug;

/// Execute CLI command
pub fn execute_command(args: Args) -> anyhow::Result<()> {
    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let file_config = config_manager
        .load_config()
        .context("Failed to load configuration")?;

    let config = resolve_config(&args, &file_config)?;
    init_logging(config.debug_level)?;
    debug!(
        "Device {}, prompt {:?}, timeout {:?}, force {}",
        config.device.display(),
        config.prompt.as_str(),
        config.timeout,
        config.force
    );

    let command = Command::from_words(&args.command);
    let mut writer = ConsoleWriter::new();
    run_command(&config, &command, &mut writer)
        .with_context(|| format!("Command '{}' on {} failed", command, config.device.display()))?;
    Ok(())
}

/// Merge command line, environment and file settings over the defaults
pub fn resolve_config(args: &Args, file: &FileConfig) -> McuxeqResult<SessionConfig> {
    let device = args
        .device
        .clone()
        .or_else(|| file.device.clone())
        .ok_or_else(|| McuxeqError::Config {
            message: "No serial device given (use --device or set MCUXEQ_DEV)".to_string(),
        })?;
    let prompt = args
        .prompt
        .as_deref()
        .or(file.prompt.as_deref())
        .unwrap_or(DEFAULT_PROMPT);
    let timeout_ms = args.timeout.or(file.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS);

    SessionConfig::new(device, prompt, timeout_ms, args.force, args.debug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    fn parse(argv: &[&str]) -> Args {
        let mut args = Args::try_parse_from(argv).unwrap();
        // Keep the caller's environment out of the assertions
        if !argv.contains(&"-s") {
            args.device = None;
        }
        if !argv.contains(&"-p") {
            args.prompt = None;
        }
        args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["mcuxeq", "-s", "/dev/ttyUSB0", "help"]);
        let config = resolve_config(&args, &FileConfig::default()).unwrap();

        assert_eq!(config.device, PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(config.prompt.as_str(), DEFAULT_PROMPT);
        assert_eq!(config.timeout, Some(Duration::from_millis(2000)));
        assert!(!config.force);
        assert_eq!(config.debug_level, 0);
    }

    #[test]
    fn test_file_fills_gaps() {
        let args = parse(&["mcuxeq", "-t", "100", "help"]);
        let file = FileConfig {
            device: Some(PathBuf::from("/dev/ttyACM3")),
            prompt: Some("^uart> $".to_string()),
            timeout_ms: Some(9000),
        };
        let config = resolve_config(&args, &file).unwrap();

        assert_eq!(config.device, PathBuf::from("/dev/ttyACM3"));
        assert_eq!(config.prompt.as_str(), "^uart> $");
        assert_eq!(config.timeout, Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let args = parse(&["mcuxeq", "-s", "/dev/ttyUSB2", "-p", "^# $", "help"]);
        let file = FileConfig {
            device: Some(PathBuf::from("/dev/ttyACM3")),
            prompt: Some("^uart> $".to_string()),
            timeout_ms: None,
        };
        let config = resolve_config(&args, &file).unwrap();

        assert_eq!(config.device, PathBuf::from("/dev/ttyUSB2"));
        assert_eq!(config.prompt.as_str(), "^# $");
    }

    #[test]
    fn test_debug_level_carried() {
        let args = parse(&["mcuxeq", "-s", "/dev/ttyUSB0", "-dd", "help"]);
        let config = resolve_config(&args, &FileConfig::default()).unwrap();
        assert_eq!(config.debug_level, 2);
    }

    #[test]
    fn test_zero_timeout_disables_timeouts() {
        let args = parse(&["mcuxeq", "-s", "/dev/ttyUSB0", "-t", "0", "help"]);
        let config = resolve_config(&args, &FileConfig::default()).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_missing_device() {
        let args = parse(&["mcuxeq", "help"]);
        let err = resolve_config(&args, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, McuxeqError::Config { .. }));
    }

    #[test]
    fn test_bad_prompt() {
        let args = parse(&["mcuxeq", "-s", "/dev/ttyUSB0", "-p", "(", "help"]);
        let err = resolve_config(&args, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, McuxeqError::Prompt(_)));
    }
}
