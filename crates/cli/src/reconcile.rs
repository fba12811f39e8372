//! `rollcall reconcile` / `rollcall validate`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rollcall_roster::reconcile::reconcile_files;
use rollcall_roster::{DuplicatePolicy, Report, RollcallConfig};

use crate::exit_codes::EXIT_IO;
use crate::CliError;

pub struct ReconcileArgs {
    pub old: Option<PathBuf>,
    pub new: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub approve: Vec<String>,
    pub id_column: Option<String>,
    pub reject_duplicates: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
}

/// Config file first, then flags on top.
fn effective_config(args: &ReconcileArgs) -> Result<RollcallConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            RollcallConfig::from_path(path)?.resolve(base)
        }
        None => RollcallConfig::default(),
    };

    if let Some(old) = &args.old {
        config.old = Some(old.clone());
    }
    if let Some(new) = &args.new {
        config.new = Some(new.clone());
    }
    if let Some(id_column) = &args.id_column {
        config.id_column = id_column.clone();
    }
    if args.reject_duplicates {
        config.on_duplicate = DuplicatePolicy::Reject;
    }
    if args.output.is_some() {
        config.output.json = args.output.clone();
    }
    config.approve.extend(args.approve.iter().map(|a| a.trim().to_string()).filter(|a| !a.is_empty()));

    config.validate()?;
    Ok(config)
}

pub fn cmd_reconcile(args: ReconcileArgs) -> Result<(), CliError> {
    let config = effective_config(&args)?;

    let old = config.old.clone().ok_or_else(|| {
        CliError::usage("no current roster given").with_hint("pass OLD NEW or set `old` in the config file")
    })?;
    let new = config.new.clone().ok_or_else(|| {
        CliError::usage("no new snapshot given").with_hint("pass OLD NEW or set `new` in the config file")
    })?;

    let approved = config.approved_edits();
    log::debug!(
        "reconcile {} <- {} (approved: {})",
        old.display(),
        new.display(),
        approved.iter().collect::<Vec<_>>().join(",")
    );

    let report = reconcile_files(&old, &new, &approved, &config.load_options())?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?;

    if let Some(path) = &config.output.json {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    } else {
        print_diff(&report).map_err(|e| CliError::new(EXIT_IO, e.to_string()))?;
    }

    eprintln!(
        "reconcile: {} new identifiers, {} new attributes, {} changed fields, {} applied; rewrote {}",
        report.new_identifiers.len(),
        report.new_attributes.len(),
        report.changed_fields(),
        report.applied_edits,
        old.display(),
    );

    Ok(())
}

fn print_diff(report: &Report) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for id in &report.new_identifiers {
        writeln!(out, "+ {id}")?;
    }
    for attribute in &report.new_attributes {
        let status = if report.added_attributes.contains(attribute) { "added" } else { "not approved" };
        writeln!(out, "+ column {attribute} ({status})")?;
    }
    for (id, fields) in &report.changed {
        for field in fields {
            let status = if field.applied { "applied" } else { "not approved" };
            writeln!(out, "~ {id} {}: {:?} -> {:?} ({status})", field.attribute, field.old, field.new)?;
        }
    }
    Ok(())
}

pub fn cmd_validate(path: PathBuf) -> Result<(), CliError> {
    let config = RollcallConfig::from_path(&path)?;
    eprintln!(
        "{}: ok (id column '{}', {} approved attributes)",
        path.display(),
        config.id_column,
        config.approved_edits().iter().count()
    );
    Ok(())
}
