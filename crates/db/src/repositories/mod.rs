//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod area_repo;
pub mod assignment_repo;
pub mod contractor_repo;
pub mod issue_photo_repo;
pub mod issue_repo;
pub mod manual_repo;
pub mod project_repo;
pub mod trade_repo;

pub use area_repo::AreaRepo;
pub use assignment_repo::AssignmentRepo;
pub use contractor_repo::ContractorRepo;
pub use issue_photo_repo::{IssuePhotoRepo, PhotoInsert};
pub use issue_repo::{IssueRepo, TransitionOutcome};
pub use manual_repo::ManualRepo;
pub use project_repo::ProjectRepo;
pub use trade_repo::TradeRepo;
