//! `rollcall-roster`: legislator roster store and snapshot reconciliation.
//!
//! Pure engine crate: loads and saves CSV rosters, diffs two snapshots and
//! merges reviewed edits. Remote lookups are injected through traits; nothing
//! here touches the network.

pub mod bioguide;
pub mod checks;
pub mod config;
pub mod error;
pub mod intake;
pub mod model;
pub mod predicate;
pub mod reconcile;
pub mod store;

pub use config::RollcallConfig;
pub use error::RosterError;
pub use model::{Record, Roster, Schema, DEFAULT_ID_COLUMN};
pub use predicate::Predicate;
pub use reconcile::{reconcile, ApprovedEdits, Report};
pub use store::{DuplicatePolicy, LoadOptions};
