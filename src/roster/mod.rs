//! Guild roster management.
//!
//! ## Module Structure
//!
//! - `members`: roster sheet repository (`RosterRepository`)
//! - `identities`: Discord account -> characters repository (`IdentityRepository`)
//! - `resolver`: ownership resolution (linked identity, else display name)
//! - `reconcile`: presence diffing for full and single-member syncs
//! - `ops`: link / add-alt / rename / unlink planning
//! - `plan`: ordered write lists and their application
//! - `service`: `RosterService`, the entry point used by the Discord handler

pub mod identities;
pub mod members;
pub mod ops;
pub mod plan;
pub mod reconcile;
pub mod resolver;
pub mod service;

pub use ops::LinkOutcome;
pub use reconcile::SyncSummary;
pub use service::{AltAdded, OwnedCharacter, RosterService};
