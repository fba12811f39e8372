//! `rollcall check`: sanity checks over active legislators.

use std::path::PathBuf;

use rollcall_roster::checks::sanity_check;
use rollcall_roster::{LoadOptions, Roster};

use crate::exit_codes::{EXIT_IO, EXIT_SANITY_ISSUES};
use crate::CliError;

pub fn cmd_check(roster: PathBuf, id_column: String, json: bool) -> Result<(), CliError> {
    let loaded = Roster::load_path(&roster, &LoadOptions::with_id_column(id_column))?;
    let issues = sanity_check(&loaded);

    if json {
        let out = serde_json::to_string_pretty(&issues)
            .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?;
        println!("{out}");
    } else {
        for issue in &issues {
            println!("{issue}");
        }
    }

    eprintln!("{}: {} records, {} issues", roster.display(), loaded.len(), issues.len());

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_SANITY_ISSUES))
    }
}
