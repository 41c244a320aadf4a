//! HTTP surface of Blue Tape: punch lists, contractor notices and the
//! Home Owner Manual. Built as a library so `tests/` drive the same router
//! as the binary.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod render;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
