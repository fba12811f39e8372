//! Bioguide identifier bookkeeping: per-letter maximum ids and scanning for
//! identifiers issued after them.
//!
//! Whether an identifier exists upstream is answered by a [`BioguideProbe`]
//! supplied by the caller. This module performs no IO.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::Roster;

/// Floors for letters that may have no tracked legislator yet.
pub const DEFAULT_MAX_IDS: [&str; 3] = ["Q000022", "X000000", "Z000016"];

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// One uppercase ASCII letter followed by six digits, e.g. `S000148`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BioguideId {
    letter: char,
    number: u32,
}

impl BioguideId {
    pub const MAX_NUMBER: u32 = 999_999;

    pub fn new(letter: char, number: u32) -> Option<Self> {
        (letter.is_ascii_uppercase() && number <= Self::MAX_NUMBER).then_some(Self { letter, number })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// The following identifier under the same letter, if the number has room.
    pub fn next(&self) -> Option<Self> {
        Self::new(self.letter, self.number + 1)
    }
}

impl fmt::Display for BioguideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:06}", self.letter, self.number)
    }
}

impl Serialize for BioguideId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBioguideId(pub String);

impl fmt::Display for InvalidBioguideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a bioguide id (expected letter + 6 digits)", self.0)
    }
}

impl std::error::Error for InvalidBioguideId {}

impl FromStr for BioguideId {
    type Err = InvalidBioguideId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidBioguideId(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(letter, number).ok_or_else(invalid)
    }
}

// ---------------------------------------------------------------------------
// Max ids
// ---------------------------------------------------------------------------

/// Greatest known identifier per leading letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaxIds {
    by_letter: BTreeMap<char, BioguideId>,
}

impl MaxIds {
    /// Built from the roster's identifiers plus [`DEFAULT_MAX_IDS`] for unseen letters.
    /// Identifiers that are not bioguide-shaped are skipped.
    pub fn from_roster(roster: &Roster) -> Self {
        Self::from_ids(roster.ids())
    }

    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_letter: BTreeMap<char, BioguideId> = BTreeMap::new();
        for raw in ids {
            match raw.parse::<BioguideId>() {
                Ok(id) => {
                    let slot = by_letter.entry(id.letter()).or_insert(id);
                    if id > *slot {
                        *slot = id;
                    }
                }
                Err(e) => log::warn!("skipping identifier: {e}"),
            }
        }

        for floor in DEFAULT_MAX_IDS {
            if let Ok(id) = floor.parse::<BioguideId>() {
                by_letter.entry(id.letter()).or_insert(id);
            }
        }

        Self { by_letter }
    }

    pub fn get(&self, letter: char) -> Option<BioguideId> {
        self.by_letter.get(&letter).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = BioguideId> + '_ {
        self.by_letter.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_letter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_letter.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Upstream has no record under this identifier.
    Missing,
    /// Upstream has a record. `None` when the name could not be extracted.
    Found(Option<PersonName>),
}

/// Answers whether an identifier exists upstream.
pub trait BioguideProbe {
    type Error;

    fn lookup(&mut self, id: &BioguideId) -> Result<ProbeOutcome, Self::Error>;
}

impl<F> BioguideProbe for F
where
    F: FnMut(&BioguideId) -> ProbeOutcome,
{
    type Error = Infallible;

    fn lookup(&mut self, id: &BioguideId) -> Result<ProbeOutcome, Self::Error> {
        Ok(self(id))
    }
}

/// An identifier past the tracked maximum that upstream knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntrackedId {
    pub id: BioguideId,
    /// `None` means the entry needs a manual look.
    pub name: Option<PersonName>,
}

/// Walk each letter forward from its maximum until the probe reports a miss.
pub fn scan_untracked<P: BioguideProbe>(
    max_ids: &MaxIds,
    probe: &mut P,
) -> Result<Vec<UntrackedId>, P::Error> {
    let mut found = Vec::new();
    for max in max_ids.iter() {
        let mut cursor = max.next();
        while let Some(id) = cursor {
            match probe.lookup(&id)? {
                ProbeOutcome::Missing => break,
                ProbeOutcome::Found(name) => {
                    log::info!("untracked bioguide id {id}");
                    found.push(UntrackedId { id, name });
                }
            }
            cursor = id.next();
        }
    }
    Ok(found)
}
