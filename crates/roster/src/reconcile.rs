use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::RosterError;
use crate::model::Roster;
use crate::store::LoadOptions;

// ---------------------------------------------------------------------------
// Approval set
// ---------------------------------------------------------------------------

/// Attribute names a reviewer has authorized for merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApprovedEdits(BTreeSet<String>);

impl ApprovedEdits {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list. Blank entries are ignored.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ApprovedEdits {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One differing value between the old and new record for an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub attribute: String,
    pub old: String,
    pub new: String,
    /// Whether the change was merged into the old roster.
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub id_column: String,
    pub approved: ApprovedEdits,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    /// Identifiers in the new roster with no counterpart in the old one. Never merged.
    pub new_identifiers: BTreeSet<String>,
    /// Attributes the new roster has and the old schema lacks, in new-schema order.
    pub new_attributes: Vec<String>,
    /// Every differing field per identifier, approved or not.
    pub changed: BTreeMap<String, Vec<FieldChange>>,
    /// New attributes appended to the old schema.
    pub added_attributes: Vec<String>,
    /// Number of changed fields written into the old roster.
    pub applied_edits: usize,
}

impl Report {
    /// True when the snapshots agree on identifiers, schema and values.
    pub fn is_empty(&self) -> bool {
        self.new_identifiers.is_empty() && self.new_attributes.is_empty() && self.changed.is_empty()
    }

    pub fn changed_fields(&self) -> usize {
        self.changed.values().map(Vec::len).sum()
    }

    /// Names of the changed attributes for `id`.
    pub fn changed_attributes(&self, id: &str) -> BTreeSet<&str> {
        self.changed
            .get(id)
            .map(|fields| fields.iter().map(|f| f.attribute.as_str()).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// Diff `new` against `old` and merge the approved attributes into `old`.
///
/// Only memory is touched; see [`reconcile_into`] and [`reconcile_files`]
/// for the variants that persist `old`.
pub fn reconcile(old: &mut Roster, new: &Roster, approved: &ApprovedEdits) -> Report {
    let new_identifiers: BTreeSet<String> = new
        .ids()
        .into_iter()
        .filter(|id| !old.contains_id(id))
        .map(str::to_string)
        .collect();

    let new_columns = attribute_order(new);
    let new_attributes: Vec<String> = new_columns
        .iter()
        .filter(|a| !old.schema().contains(a))
        .cloned()
        .collect();

    // Per-record diff. Attributes the new record lacks are never compared.
    let mut changed: BTreeMap<String, Vec<FieldChange>> = BTreeMap::new();
    for id in new.ids() {
        let (Some(old_rec), Some(new_rec)) = (old.get(id), new.get(id)) else {
            continue;
        };
        let fields: Vec<FieldChange> = new_columns
            .iter()
            .filter(|a| new_rec.contains(a))
            .filter(|a| old_rec.value(a) != new_rec.value(a))
            .map(|a| FieldChange {
                attribute: a.clone(),
                old: old_rec.value(a).to_string(),
                new: new_rec.value(a).to_string(),
                applied: approved.contains(a),
            })
            .collect();
        if !fields.is_empty() {
            changed.insert(id.to_string(), fields);
        }
    }

    // Schema extension for approved new attributes.
    let old_ids: Vec<String> = old.ids().into_iter().map(str::to_string).collect();
    let mut added_attributes = Vec::new();
    for attribute in new_attributes.iter().filter(|a| approved.contains(a)) {
        old.add_attribute(attribute);
        for id in &old_ids {
            let value = new.get(id).map(|r| r.value(attribute)).unwrap_or("");
            old.set_value(id, attribute, value);
        }
        added_attributes.push(attribute.clone());
    }

    // Value merge for approved changed fields.
    let mut applied_edits = 0;
    for (id, fields) in &changed {
        for field in fields.iter().filter(|f| f.applied) {
            if old.set_value(id, &field.attribute, &field.new) {
                applied_edits += 1;
            }
        }
    }

    let report = Report {
        meta: ReportMeta {
            id_column: old.id_column().to_string(),
            approved: approved.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        new_identifiers,
        new_attributes,
        changed,
        added_attributes,
        applied_edits,
    };

    log::info!(
        "reconcile: {} new identifiers, {} new attributes, {} changed fields across {} records, {} applied",
        report.new_identifiers.len(),
        report.new_attributes.len(),
        report.changed_fields(),
        report.changed.len(),
        report.applied_edits,
    );

    report
}

/// [`reconcile`], then write `old` to `sink` whether or not anything was approved.
pub fn reconcile_into<W: Write>(
    old: &mut Roster,
    new: &Roster,
    approved: &ApprovedEdits,
    sink: W,
) -> Result<Report, RosterError> {
    let report = reconcile(old, new, approved);
    old.save(sink)?;
    Ok(report)
}

/// Load both snapshots, reconcile, and rewrite `old_path` in full.
///
/// Both files are loaded before anything is written, so a malformed input
/// leaves `old_path` untouched.
pub fn reconcile_files(
    old_path: &Path,
    new_path: &Path,
    approved: &ApprovedEdits,
    options: &LoadOptions,
) -> Result<Report, RosterError> {
    let mut old = Roster::load_path(old_path, options)?;
    let new = Roster::load_path(new_path, options)?;
    let report = reconcile(&mut old, &new, approved);
    old.save_path(old_path)?;
    Ok(report)
}

/// Schema columns, then any record attributes outside the schema (sorted).
fn attribute_order(roster: &Roster) -> Vec<String> {
    let mut columns: Vec<String> = roster.schema().iter().map(str::to_string).collect();
    let mut extras: BTreeSet<&str> = BTreeSet::new();
    for record in roster.records() {
        extras.extend(record.attributes().filter(|a| !roster.schema().contains(a)));
    }
    columns.extend(extras.into_iter().map(str::to_string));
    columns
}
