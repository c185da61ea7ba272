//! External character-stats lookup.
//!
//! Not used by reconciliation; the roster sheet's own score columns back the
//! score and power commands. This client only serves `/lookup`.

pub mod client;

pub use client::StatsClient;
