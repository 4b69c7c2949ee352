//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chaos-test a gateway by injecting dependency faults under load", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for the report, overriding the configuration
    #[arg(long, value_name = "PATH", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Also write the results as JSON next to the Markdown report
    #[arg(long, global = true)]
    pub json: bool,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run every configured scenario and write the report
    Run,

    /// List the configured scenario sequence
    Scenarios,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },

    /// Generate a sample configuration file with every default spelled out
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_required() {
        let cli = Cli::try_parse_from(["faultline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "faultline",
            "run",
            "--config",
            "chaos.yaml",
            "--log-level",
            "debug",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Run));
        assert_eq!(cli.config, Some(PathBuf::from("chaos.yaml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_config_subcommands() {
        let cli =
            Cli::try_parse_from(["faultline", "config", "generate", "--output", "f.yaml", "--force"])
                .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                config_cmd: ConfigCommands::Generate {
                    output: PathBuf::from("f.yaml"),
                    force: true,
                }
            })
        );

        assert!(Cli::try_parse_from(["faultline", "config", "validate"]).is_err());
    }
}
