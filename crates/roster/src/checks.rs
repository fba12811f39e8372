//! Fixed-rule consistency checks over the active legislators of a roster.
//!
//! Senators are keyed by seat (`district` holds "Junior Seat" / "Senior Seat"),
//! representatives by numbered district, and every other title counts as a
//! non-voting delegate.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::model::Roster;
use crate::predicate::Predicate;

/// Jurisdictions represented by a delegate rather than by senators.
pub const NONSTATES: [&str; 6] = ["DC", "PR", "GU", "VI", "AS", "MP"];

pub const JUNIOR_SEAT: &str = "Junior Seat";
pub const SENIOR_SEAT: &str = "Senior Seat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SanityIssue {
    TooManySenators { state: String, count: usize },
    MissingJuniorSenator { state: String },
    MissingSeniorSenator { state: String },
    /// Sorted districts that are not `1..=n` (or `[0]` for a lone at-large member).
    UnexpectedDistricts { state: String, districts: Vec<u32> },
    NonNumericDistrict { state: String, district: String },
    /// Symmetric difference between delegate states and [`NONSTATES`].
    DelegateMismatch { states: Vec<String> },
}

impl fmt::Display for SanityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManySenators { state, count } => write!(f, "{state} has {count} senators"),
            Self::MissingJuniorSenator { state } => write!(f, "{state} has no Junior Senator"),
            Self::MissingSeniorSenator { state } => write!(f, "{state} has no Senior Senator"),
            Self::UnexpectedDistricts { state, districts } => {
                write!(f, "{state} has districts: {districts:?}")
            }
            Self::NonNumericDistrict { state, district } => {
                write!(f, "{state} has non-numeric district '{district}'")
            }
            Self::DelegateMismatch { states } => {
                write!(f, "missing delegates from: {}", states.join(","))
            }
        }
    }
}

/// Run every check. Issues come back grouped by rule, states in sorted order.
pub fn sanity_check(roster: &Roster) -> Vec<SanityIssue> {
    let active = Predicate::new().eq("in_office", "1");
    let mut sens: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut reps: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut dels: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for leg in roster.find_all(&active) {
        let bucket = match leg.value("title") {
            "Sen" => &mut sens,
            "Rep" => &mut reps,
            _ => &mut dels,
        };
        bucket
            .entry(leg.value("state"))
            .or_default()
            .push(leg.value("district"));
    }

    let mut issues = Vec::new();
    check_senators(&sens, &mut issues);
    check_representatives(&reps, &mut issues);
    check_delegates(&dels, &mut issues);

    log::debug!("sanity check: {} issues", issues.len());
    issues
}

fn check_senators(sens: &BTreeMap<&str, Vec<&str>>, issues: &mut Vec<SanityIssue>) {
    for (state, seats) in sens {
        if seats.len() > 2 {
            issues.push(SanityIssue::TooManySenators {
                state: state.to_string(),
                count: seats.len(),
            });
        }
        if !seats.contains(&JUNIOR_SEAT) {
            issues.push(SanityIssue::MissingJuniorSenator { state: state.to_string() });
        }
        if !seats.contains(&SENIOR_SEAT) {
            issues.push(SanityIssue::MissingSeniorSenator { state: state.to_string() });
        }
    }
}

fn check_representatives(reps: &BTreeMap<&str, Vec<&str>>, issues: &mut Vec<SanityIssue>) {
    for (state, raw) in reps {
        let mut districts = Vec::with_capacity(raw.len());
        let mut numeric = true;
        for district in raw {
            match district.trim().parse::<u32>() {
                Ok(n) => districts.push(n),
                Err(_) => {
                    numeric = false;
                    issues.push(SanityIssue::NonNumericDistrict {
                        state: state.to_string(),
                        district: district.to_string(),
                    });
                }
            }
        }
        if !numeric {
            continue;
        }

        districts.sort_unstable();
        let count = raw.len() as u32;
        let expected: Vec<u32> = if count > 1 { (1..=count).collect() } else { vec![0] };
        if districts != expected {
            issues.push(SanityIssue::UnexpectedDistricts {
                state: state.to_string(),
                districts,
            });
        }
    }
}

fn check_delegates(dels: &BTreeMap<&str, Vec<&str>>, issues: &mut Vec<SanityIssue>) {
    let have: BTreeSet<&str> = dels.keys().copied().collect();
    let want: BTreeSet<&str> = NONSTATES.into_iter().collect();
    let diffs: Vec<String> = have
        .symmetric_difference(&want)
        .map(|s| s.to_string())
        .collect();
    if !diffs.is_empty() {
        issues.push(SanityIssue::DelegateMismatch { states: diffs });
    }
}
