//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches. Fields
//!   that may be cleared are `Option<Option<T>>` read through [`clearable`].

pub mod area;
pub mod assignment;
pub mod contractor;
pub mod issue;
pub mod manual;
pub mod project;
pub mod trade;

/// Deserialize a patch field so that an explicit `null` becomes `Some(None)`.
///
/// Pair with `#[serde(default)]` so an absent key stays `None`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}
