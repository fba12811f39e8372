//! `rollcall find` / `rollcall bioguide`.

use std::io;
use std::path::PathBuf;

use rollcall_roster::bioguide::MaxIds;
use rollcall_roster::{LoadOptions, Predicate, Record, Roster};

use crate::exit_codes::{EXIT_IO, EXIT_NO_MATCH};
use crate::CliError;

pub fn cmd_find(
    roster: PathBuf,
    clauses: Vec<String>,
    all: bool,
    id_column: String,
) -> Result<(), CliError> {
    let mut predicate = Predicate::new();
    for clause in &clauses {
        predicate = predicate.and_expr(clause)?;
    }

    let loaded = Roster::load_path(&roster, &LoadOptions::with_id_column(id_column))?;

    let mut matches: Vec<&Record> = if all {
        loaded.find_all(&predicate).collect()
    } else {
        loaded.find_one(&predicate).into_iter().collect()
    };
    matches.sort_by(|a, b| a.value(loaded.id_column()).cmp(b.value(loaded.id_column())));

    if matches.is_empty() {
        return Err(CliError::new(EXIT_NO_MATCH, "no matching record"));
    }

    write_records(&loaded, &matches).map_err(|e| CliError::new(EXIT_IO, e.to_string()))?;
    Ok(())
}

fn write_records(roster: &Roster, records: &[&Record]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(io::stdout().lock());
    writer.write_record(roster.schema().iter())?;
    for record in records {
        writer.write_record(roster.schema().iter().map(|c| record.value(c)))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn cmd_bioguide(roster: PathBuf, id_column: String) -> Result<(), CliError> {
    let loaded = Roster::load_path(&roster, &LoadOptions::with_id_column(id_column))?;
    let max_ids = MaxIds::from_roster(&loaded);

    for max in max_ids.iter() {
        match max.next() {
            Some(next) => println!("{}  {max}  next {next}", max.letter()),
            None => println!("{}  {max}  exhausted", max.letter()),
        }
    }
    Ok(())
}
