//! Request extractors for identity and write access.

pub mod auth;
pub mod rbac;
