use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command line arguments for mcuxeq
#[derive(Parser, Debug)]
#[command(
    name = "mcuxeq",
    version = env!("CARGO_PKG_VERSION"),
    about = "Microcontroller Command/Response Utility",
    long_about = "Send one command to a microcontroller shell over a serial device, \
                  wait for its echo, and print the response up to the next prompt."
)]
pub struct Args {
    /// Serial device to use
    #[arg(short = 's', long, env = "MCUXEQ_DEV", value_name = "DEV")]
    pub device: Option<PathBuf>,

    /// Expected prompt regex [default: ^[[:alnum:]]*[#$>] $]
    #[arg(short, long, env = "MCUXEQ_PROMPT", value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Timeout value in milliseconds, 0 or less waits forever [default: 2000]
    #[arg(short, long, value_name = "MS", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Increase debug level
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Force open when busy (needs CAP_SYS_ADMIN)
    #[arg(short, long)]
    pub force: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Command to send to the device
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{DEVICE_ENV, PROMPT_ENV};
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_env_names_match_constants() {
        let cmd = Args::command();
        let env_of = |id: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == id)
                .and_then(|a| a.get_env())
                .map(|e| e.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("device").as_deref(), Some(DEVICE_ENV));
        assert_eq!(env_of("prompt").as_deref(), Some(PROMPT_ENV));
    }

    #[test]
    fn test_parse_full() {
        let args = Args::try_parse_from([
            "mcuxeq", "-s", "/dev/ttyUSB1", "-p", "^=> $", "-t", "500", "-dd", "-f", "gpio", "0",
            "pulse",
        ])
        .unwrap();

        assert_eq!(args.device, Some(PathBuf::from("/dev/ttyUSB1")));
        assert_eq!(args.prompt.as_deref(), Some("^=> $"));
        assert_eq!(args.timeout, Some(500));
        assert_eq!(args.debug, 2);
        assert!(args.force);
        assert_eq!(args.command, vec!["gpio", "0", "pulse"]);
    }

    #[test]
    fn test_negative_timeout() {
        let args = Args::try_parse_from(["mcuxeq", "-s", "/dev/null", "-t", "-1", "reset"]).unwrap();
        assert_eq!(args.timeout, Some(-1));
    }

    #[test]
    fn test_command_words_after_separator() {
        let args =
            Args::try_parse_from(["mcuxeq", "-s", "/dev/null", "--", "-f", "--debug"]).unwrap();
        assert!(!args.force);
        assert_eq!(args.debug, 0);
        assert_eq!(args.command, vec!["-f", "--debug"]);
    }

    #[test]
    fn test_options_after_command_are_command_words() {
        let args = Args::try_parse_from(["mcuxeq", "-s", "/dev/null", "echo", "-d"]).unwrap();
        assert_eq!(args.debug, 0);
        assert_eq!(args.command, vec!["echo", "-d"]);
    }

    #[test]
    fn test_command_required() {
        assert!(Args::try_parse_from(["mcuxeq", "-s", "/dev/null"]).is_err());
    }
}
