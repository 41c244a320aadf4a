//! Area registry rules: the default template and reordering.

use crate::error::CoreError;
use crate::types::DbId;

/// Areas seeded into a project when `create_default_areas` is set.
pub const DEFAULT_AREAS: &[&str] = &[
    "Exterior",
    "Garage",
    "Living Room",
    "Kitchen",
    "Dining Room",
    "Hallway",
    "Master Bedroom",
    "Bedroom 2",
    "Bedroom 3",
    "Master Bathroom",
    "Bathroom 2",
    "Powder Room",
    "Laundry",
    "Attic/Crawlspace",
    "Mechanical/HVAC",
    "Electrical Panel",
    "Plumbing",
    "Roof",
];

/// Maximum length of an area name.
pub const MAX_AREA_NAME_LEN: usize = 100;

/// Trim and validate an area name.
pub fn normalize_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Area name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_AREA_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Area name must be at most {MAX_AREA_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Sort position for a new custom area: the explicit order, else the number
/// of areas already in the project.
pub fn default_order(requested: Option<i32>, existing_count: i64) -> i32 {
    requested.unwrap_or_else(|| i32::try_from(existing_count).unwrap_or(i32::MAX))
}

/// Compute `(area_id, new_order)` pairs for a reorder request.
///
/// The position in `ordered_ids` becomes the order. Ids not belonging to the
/// project are skipped without shifting later positions.
pub fn reorder_plan(ordered_ids: &[DbId], project_area_ids: &[DbId]) -> Vec<(DbId, i32)> {
    ordered_ids
        .iter()
        .enumerate()
        .filter(|(_, id)| project_area_ids.contains(id))
        .map(|(pos, id)| (*id, pos as i32))
        .collect()
}
