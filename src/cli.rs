use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::FlowVariant;

/// raflow - Registered Agent Service signup wizard
#[derive(Parser, Debug)]
#[command(name = "raflow")]
#[command(about = "Registered Agent Service signup wizard for the terminal")]
#[command(version)]
pub struct Cli {
    /// JSON settings file (variant, analysis timing, auto-advance delay, filing fee)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive wizard
    Run {
        /// Business-age step flavour: "date" asks for a start date, "status"
        /// asks new or existing directly
        #[arg(long)]
        variant: Option<FlowVariant>,
    },
    /// Drive the wizard from an answers file and print the transcript
    Replay {
        /// JSON answers file
        answers: PathBuf,
    },
    /// Print the plan catalog
    Plans,
    /// Print the state statistics used in the funnel copy
    StateInfo {
        /// State name, e.g. "Texas"
        name: String,
    },
    /// Classify a business start date as new or existing
    Classify {
        /// Start date (YYYY-MM-DD)
        date: NaiveDate,
        /// Date to classify against (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Whether the command takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Run { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args() {
        // Running with no args should succeed (defaults to the interactive wizard)
        let cli = Cli::try_parse_from(["raflow"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_cli_run_with_variant() {
        let cli = Cli::try_parse_from(["raflow", "run", "--variant", "status"]).expect("parse");
        assert_eq!(
            cli.command,
            Some(Commands::Run {
                variant: Some(FlowVariant::DirectChoice)
            })
        );
    }

    #[test]
    fn test_cli_rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["raflow", "run", "--variant", "quiz"]).is_err());
    }

    #[test]
    fn test_cli_replay_with_global_flags() {
        let cli = Cli::try_parse_from([
            "raflow",
            "replay",
            "answers.json",
            "--settings",
            "settings.json",
            "--log-file",
            "raflow.log",
        ])
        .expect("parse");
        assert!(!cli.is_interactive());
        assert_eq!(cli.settings, Some(PathBuf::from("settings.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("raflow.log")));
        assert_eq!(
            cli.command,
            Some(Commands::Replay {
                answers: PathBuf::from("answers.json")
            })
        );
    }

    #[test]
    fn test_cli_classify_parses_dates() {
        let cli = Cli::try_parse_from(["raflow", "classify", "2026-07-17", "--today", "2026-10-17"])
            .expect("parse");
        assert_eq!(
            cli.command,
            Some(Commands::Classify {
                date: NaiveDate::from_ymd_opt(2026, 7, 17).expect("date"),
                today: NaiveDate::from_ymd_opt(2026, 10, 17),
            })
        );
        assert!(Cli::try_parse_from(["raflow", "classify", "17/07/2026"]).is_err());
    }

    #[test]
    fn test_cli_state_info() {
        let cli = Cli::try_parse_from(["raflow", "state-info", "New York"]).expect("parse");
        assert_eq!(
            cli.command,
            Some(Commands::StateInfo {
                name: "New York".to_string()
            })
        );
    }
}
