//! JSON bodies that wrap handler output.

use serde::Serialize;

/// Every successful JSON body is `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A window of a listing. `total` counts every row matching the filters.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}
