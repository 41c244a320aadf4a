//! Query strings shared by more than one resource.

use serde::Deserialize;

/// `?include_inactive=true` brings deactivated catalog entries back into a
/// listing.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
