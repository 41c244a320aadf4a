//! Token handling for the identity service that fronts the API.

pub mod jwt;
