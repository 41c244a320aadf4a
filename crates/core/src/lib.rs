//! Domain rules for the Blue Tape punch list service.
//!
//! Everything here is pure: no database, no HTTP, no file system. The `db`
//! and `api` crates call into these modules to decide what to persist.

pub mod area;
pub mod contact;
pub mod error;
pub mod issue;
pub mod lifecycle;
pub mod manual;
pub mod report;
pub mod roles;
pub mod search;
pub mod status;
pub mod trade;
pub mod types;
pub mod upload;
