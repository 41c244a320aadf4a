//! Route definitions for the contractor directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::contractor;
use crate::state::AppState;

/// Routes mounted at `/contractors`.
///
/// ```text
/// GET    /              -> list (?search=&trade_id=&limit=&offset=)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contractor::list).post(contractor::create))
        .route(
            "/{id}",
            get(contractor::get_by_id)
                .put(contractor::update)
                .delete(contractor::deactivate),
        )
}
