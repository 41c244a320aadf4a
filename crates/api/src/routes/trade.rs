//! Route definitions for the trade catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::trade;
use crate::state::AppState;

/// Routes mounted at `/trades`.
///
/// ```text
/// GET    /              -> list (?include_inactive=)
/// POST   /              -> create
/// GET    /names         -> list_names
/// GET    /{id}          -> get_by_id (with contractors)
/// PUT    /{id}          -> update
/// DELETE /{id}          -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trade::list).post(trade::create))
        .route("/names", get(trade::list_names))
        .route(
            "/{id}",
            get(trade::get_by_id)
                .put(trade::update)
                .delete(trade::deactivate),
        )
}
