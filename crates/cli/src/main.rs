// rollcall CLI - legislator roster maintenance
// Thin wrapper over rollcall-roster: load, reconcile, save, check, look up.

mod check;
mod exit_codes;
mod lookup;
mod reconcile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{roster_exit_code, EXIT_SUCCESS, EXIT_USAGE};
use rollcall_roster::RosterError;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Keep a legislator roster CSV in sync with newer snapshots")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff a new roster snapshot against the current roster and merge approved attributes
    #[command(after_help = "\
Examples:
  rollcall reconcile legislators.csv legislators-new.csv
  rollcall reconcile legislators.csv legislators-new.csv --approve party,twitter_id
  rollcall reconcile --config rollcall.toml --json
  rollcall reconcile legislators.csv new.csv --output report.json

The current roster is always rewritten, sorted by identifier, even when
nothing is approved. New identifiers are reported and never inserted.")]
    Reconcile {
        /// Current roster (rewritten in place)
        old: Option<PathBuf>,

        /// Newer snapshot (read only)
        new: Option<PathBuf>,

        /// TOML run configuration
        #[arg(long, short = 'c', env = "ROLLCALL_CONFIG")]
        config: Option<PathBuf>,

        /// Attributes approved for merging (comma-separated, repeatable)
        #[arg(long, value_delimiter = ',')]
        approve: Vec<String>,

        /// Identifier column name
        #[arg(long)]
        id_column: Option<String>,

        /// Fail on duplicate identifiers instead of keeping the last row
        #[arg(long)]
        reject_duplicates: bool,

        /// Print the JSON report to stdout instead of the human diff
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Run consistency checks over active legislators
    #[command(after_help = "\
Examples:
  rollcall check legislators.csv
  rollcall check legislators.csv --json")]
    Check {
        roster: PathBuf,

        /// Identifier column name
        #[arg(long, default_value = rollcall_roster::DEFAULT_ID_COLUMN)]
        id_column: String,

        /// Print issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print records matching every attribute=value clause
    #[command(after_help = "\
Examples:
  rollcall find legislators.csv --where votesmart_id=26976
  rollcall find legislators.csv --where state=NY --where title=Sen --all")]
    Find {
        roster: PathBuf,

        /// Clause in the form attribute=value (repeatable)
        #[arg(long = "where", value_name = "EXPR", required = true)]
        clauses: Vec<String>,

        /// Print every match instead of the first
        #[arg(long)]
        all: bool,

        /// Identifier column name
        #[arg(long, default_value = rollcall_roster::DEFAULT_ID_COLUMN)]
        id_column: String,
    },

    /// Show the highest bioguide id per letter and the next id to probe
    Bioguide {
        roster: PathBuf,

        /// Identifier column name
        #[arg(long, default_value = rollcall_roster::DEFAULT_ID_COLUMN)]
        id_column: String,
    },

    /// Validate a TOML run configuration without running it
    Validate { config: PathBuf },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("ROLLCALL_GIT_HASH"),
        ")",
        "\nengine:  rollcall-roster ",
        env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reconcile {
            old,
            new,
            config,
            approve,
            id_column,
            reject_duplicates,
            json,
            output,
        } => reconcile::cmd_reconcile(reconcile::ReconcileArgs {
            old,
            new,
            config,
            approve,
            id_column,
            reject_duplicates,
            json,
            output,
        }),
        Commands::Check { roster, id_column, json } => check::cmd_check(roster, id_column, json),
        Commands::Find { roster, clauses, all, id_column } => {
            lookup::cmd_find(roster, clauses, all, id_column)
        }
        Commands::Bioguide { roster, id_column } => lookup::cmd_bioguide(roster, id_column),
        Commands::Validate { config } => reconcile::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Exit with `code` and no message; the command already reported its outcome.
    pub fn silent(code: u8) -> Self {
        Self::new(code, "")
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<RosterError> for CliError {
    fn from(err: RosterError) -> Self {
        let code = roster_exit_code(&err);
        let hint = match &err {
            RosterError::MissingIdColumn { .. } => {
                Some("pass --id-column if the roster keys on a different column".to_string())
            }
            RosterError::DuplicateId { .. } => {
                Some("drop --reject-duplicates to keep the last row for each identifier".to_string())
            }
            RosterError::InvalidPredicate(_) => Some("syntax: --where 'attribute=value'".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
