// CSV load/save and attribute lookups for `Roster`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Deserialize;

use crate::error::RosterError;
use crate::model::{Record, Roster, Schema, DEFAULT_ID_COLUMN};
use crate::predicate::Predicate;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do when a source names the same identifier twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later rows overwrite earlier ones. Each overwrite is logged.
    #[default]
    LastWins,
    /// Fail the load on the first repeated identifier.
    Reject,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub id_column: String,
    pub duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            duplicates: DuplicatePolicy::LastWins,
        }
    }
}

impl LoadOptions {
    pub fn with_id_column(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Load / Save
// ---------------------------------------------------------------------------

impl Roster {
    /// Load a header-described CSV source. Row order is discarded.
    pub fn load<R: Read>(source: R, options: &LoadOptions) -> Result<Self, RosterError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(RosterError::EmptySchema);
        }

        let schema = Schema::new(headers.iter())?;
        let mut roster = Roster::new(options.id_column.clone(), schema)?;
        let id_idx = headers
            .iter()
            .position(|h| h == options.id_column)
            .ok_or_else(|| RosterError::MissingIdColumn { column: options.id_column.clone() })?;
        let columns = headers.len();

        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            if row.len() > columns {
                return Err(RosterError::RowTooLong { line, fields: row.len(), columns });
            }

            let id = row.get(id_idx).unwrap_or("");
            if id.is_empty() {
                return Err(RosterError::MissingId { line: Some(line) });
            }

            let record = Record::from_pairs(
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h, row.get(i).unwrap_or(""))),
            );

            if roster.contains_id(id) {
                match options.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(RosterError::DuplicateId { id: id.to_string(), line });
                    }
                    DuplicatePolicy::LastWins => {
                        log::warn!("line {line}: duplicate identifier '{id}' replaces earlier record");
                    }
                }
            }
            roster.put(id.to_string(), record);
        }

        log::debug!(
            "loaded {} records, {} columns, id column '{}'",
            roster.len(),
            roster.schema().len(),
            roster.id_column()
        );
        Ok(roster)
    }

    pub fn load_str(data: &str, options: &LoadOptions) -> Result<Self, RosterError> {
        Self::load(data.as_bytes(), options)
    }

    pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Self, RosterError> {
        let file = File::open(path)
            .map_err(|e| RosterError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::load(file, options)
    }

    /// Write a header naming the schema, then every record ordered by identifier.
    pub fn save<W: Write>(&self, sink: W) -> Result<(), RosterError> {
        let mut writer = csv::WriterBuilder::new().from_writer(sink);
        writer.write_record(self.schema().iter())?;

        for id in self.ids() {
            if let Some(record) = self.get(id) {
                writer.write_record(self.schema().iter().map(|column| record.value(column)))?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Replace the file at `path` with this roster.
    pub fn save_path(&self, path: &Path) -> Result<(), RosterError> {
        let file = File::create(path)
            .map_err(|e| RosterError::Io(format!("cannot write {}: {e}", path.display())))?;
        self.save(file)?;
        log::info!("wrote {} records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, RosterError> {
        let mut buf = Vec::new();
        self.save(&mut buf)?;
        String::from_utf8(buf).map_err(|e| RosterError::Csv(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Some matching record, or `None`. Which one is unspecified when several match.
    pub fn find_one(&self, predicate: &Predicate) -> Option<&Record> {
        self.records().find(|r| predicate.matches(r))
    }

    /// Every matching record, in unspecified order.
    pub fn find_all<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a Record> + 'a {
        self.records().filter(move |r| predicate.matches(r))
    }

    pub fn find_one_by<F>(&self, mut f: F) -> Option<&Record>
    where
        F: FnMut(&Record) -> bool,
    {
        self.records().find(|r| f(*r))
    }

    pub fn find_all_by<'a, F>(&'a self, mut f: F) -> impl Iterator<Item = &'a Record> + 'a
    where
        F: FnMut(&Record) -> bool + 'a,
    {
        self.records().filter(move |r| f(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
bioguide_id,last_name,state,title,party
S000148,Schumer,NY,Sen,D
G000555,Gillibrand,NY,Sen,D
P000197,Pelosi,CA,Rep,D
";

    fn load(data: &str) -> Result<Roster, RosterError> {
        Roster::load_str(data, &LoadOptions::default())
    }

    #[test]
    fn load_basic() {
        let roster = load(CSV).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(
            roster.schema().columns(),
            &["bioguide_id", "last_name", "state", "title", "party"]
        );
        assert_eq!(roster.get("P000197").unwrap().value("state"), "CA");
    }

    #[test]
    fn load_rejects_missing_id_column() {
        let err = load("last_name,state\nSchumer,NY\n").unwrap_err();
        assert!(matches!(err, RosterError::MissingIdColumn { ref column } if column == "bioguide_id"));
        assert!(err.is_format_error());
    }

    #[test]
    fn load_rejects_empty_source() {
        assert!(matches!(load("").unwrap_err(), RosterError::EmptySchema));
    }

    #[test]
    fn load_rejects_empty_identifier() {
        let err = load("bioguide_id,state\nS000148,NY\n,CA\n").unwrap_err();
        assert!(matches!(err, RosterError::MissingId { line: Some(3) }));
    }

    #[test]
    fn load_rejects_long_row() {
        let err = load("bioguide_id,state\nS000148,NY,extra\n").unwrap_err();
        assert!(matches!(err, RosterError::RowTooLong { fields: 3, columns: 2, .. }));
    }

    #[test]
    fn load_pads_short_row() {
        let roster = load("bioguide_id,state,party\nS000148,NY\n").unwrap();
        let rec = roster.get("S000148").unwrap();
        assert_eq!(rec.get("party"), Some(""));
    }

    #[test]
    fn duplicate_last_wins_by_default() {
        let roster = load("bioguide_id,party\nA000001,D\nA000001,R\n").unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("A000001").unwrap().value("party"), "R");
    }

    #[test]
    fn duplicate_rejected_on_request() {
        let options = LoadOptions {
            duplicates: DuplicatePolicy::Reject,
            ..LoadOptions::default()
        };
        let err = Roster::load_str("bioguide_id,party\nA000001,D\nA000001,R\n", &options).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateId { ref id, line: 3 } if id == "A000001"));
    }

    #[test]
    fn custom_id_column() {
        let roster =
            Roster::load_str("votesmart_id,name\n26976,Schumer\n", &LoadOptions::with_id_column("votesmart_id"))
                .unwrap();
        assert_eq!(roster.id_column(), "votesmart_id");
        assert!(roster.get("26976").is_some());
    }

    #[test]
    fn save_orders_by_identifier() {
        let roster = load(CSV).unwrap();
        let out = roster.to_csv_string().unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "bioguide_id,last_name,state,title,party");
        assert!(lines[1].starts_with("G000555,"));
        assert!(lines[2].starts_with("P000197,"));
        assert!(lines[3].starts_with("S000148,"));
    }

    #[test]
    fn save_quotes_embedded_commas() {
        let roster = load("bioguide_id,office\nA000001,\"123 Main St, Suite 4\"\n").unwrap();
        let reloaded = load(&roster.to_csv_string().unwrap()).unwrap();
        assert_eq!(reloaded.get("A000001").unwrap().value("office"), "123 Main St, Suite 4");
    }

    #[test]
    fn find_one_and_all() {
        let roster = load(CSV).unwrap();

        let pelosi = roster.find_one(&Predicate::new().eq("last_name", "Pelosi")).unwrap();
        assert_eq!(pelosi.value("bioguide_id"), "P000197");
        assert!(roster.find_one(&Predicate::new().eq("state", "TX")).is_none());

        let ny = Predicate::new().eq("state", "NY").eq("title", "Sen");
        let mut ids: Vec<&str> = roster.find_all(&ny).map(|r| r.value("bioguide_id")).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["G000555", "S000148"]);
        // Re-iterable by calling again.
        assert_eq!(roster.find_all(&ny).count(), 2);
    }

    #[test]
    fn find_by_closure() {
        let roster = load(CSV).unwrap();
        let found = roster.find_one_by(|r| r.value("last_name").starts_with("Gill")).unwrap();
        assert_eq!(found.value("bioguide_id"), "G000555");
        assert_eq!(roster.find_all_by(|r| r.value("party") == "D").count(), 3);
    }
}
