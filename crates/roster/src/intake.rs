// Detect externally sourced legislators that the roster does not track yet,
// and enroll them under identifiers supplied by the caller.

use crate::error::RosterError;
use crate::model::{Record, Roster};
use crate::predicate::Predicate;

/// Supplies a bioguide id for a candidate, or `None` to skip it.
pub trait IdProvider {
    fn bioguide_id_for(&mut self, candidate: &Record) -> Option<String>;
}

impl<F> IdProvider for F
where
    F: FnMut(&Record) -> Option<String>,
{
    fn bioguide_id_for(&mut self, candidate: &Record) -> Option<String> {
        self(candidate)
    }
}

/// Candidates whose `key_column` value matches no roster record.
/// Candidates with an empty key are skipped.
pub fn missing_candidates<'a>(
    roster: &Roster,
    candidates: &'a [Record],
    key_column: &str,
) -> Vec<&'a Record> {
    candidates
        .iter()
        .filter(|c| {
            let key = c.value(key_column);
            if key.is_empty() {
                log::warn!("candidate without '{key_column}' skipped");
                return false;
            }
            roster.find_one(&Predicate::new().eq(key_column, key)).is_none()
        })
        .collect()
}

/// Insert each missing candidate under the id its provider returns.
///
/// Returns the enrolled ids in candidate order. An id the roster already
/// holds is never overwritten; that candidate is skipped. Each candidate's key
/// is checked against the roster as it stands, so a key enrolled earlier in
/// the batch is not enrolled again.
pub fn enroll<P: IdProvider>(
    roster: &mut Roster,
    candidates: &[Record],
    key_column: &str,
    provider: &mut P,
) -> Result<Vec<String>, RosterError> {
    let missing: Vec<Record> = missing_candidates(roster, candidates, key_column)
        .into_iter()
        .cloned()
        .collect();

    let mut enrolled = Vec::new();
    for mut candidate in missing {
        let key = candidate.value(key_column);
        if roster.find_one(&Predicate::new().eq(key_column, key)).is_some() {
            log::warn!("'{key_column}={key}' enrolled earlier in this batch; duplicate candidate skipped");
            continue;
        }
        let Some(id) = provider.bioguide_id_for(&candidate) else {
            continue;
        };
        let id = id.trim().to_string();
        if id.is_empty() {
            continue;
        }
        if roster.contains_id(&id) {
            log::warn!("'{id}' is already on the roster; candidate not enrolled");
            continue;
        }
        candidate.set(roster.id_column().to_string(), id.clone());
        roster.insert(candidate)?;
        log::info!("enrolled {id}");
        enrolled.push(id);
    }
    Ok(enrolled)
}
