//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `bluetape_db`, apply domain
//! rules from `bluetape_core`, and map errors via [`AppError`](crate::error::AppError).

pub mod area;
pub mod assignment;
pub mod contractor;
pub mod issue;
pub mod manual;
pub mod multipart;
pub mod notification;
pub mod photo;
pub mod project;
pub mod report;
pub mod trade;
