pub mod contractor;
pub mod health;
pub mod project;
pub mod trade;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::{area, issue, manual, multipart};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /areas/defaults                                  default area template
/// /issues/categories                               default issue categories
/// /manual/sections                                 manual section structure
///
/// /trades                                          list, create
/// /trades/names                                    active trade names
/// /trades/{id}                                     get, update, deactivate
///
/// /contractors                                     list, create
/// /contractors/{id}                                get, update, deactivate
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{project_id}/dashboard                 issue counts
/// /projects/{project_id}/areas                     list, create
/// /projects/{project_id}/areas/reorder             reorder (PUT)
/// /projects/{project_id}/areas/{area_id}           get, update, delete
/// /projects/{project_id}/assignments               list, create
/// /projects/{project_id}/assignments/{id}          get, update, delete
/// /projects/{project_id}/assignments/{id}/remind   pending-work reminder (POST)
/// /projects/{project_id}/issues                    list, create
/// /projects/{project_id}/issues/{id}               get, update, delete
/// /projects/{project_id}/issues/{id}/status        status change (POST)
/// /projects/{project_id}/issues/{id}/notify        notify contractor (POST)
/// /projects/{project_id}/issues/{id}/photos        list, upload
/// /projects/{project_id}/issues/{id}/photos/{pid}  delete
/// /projects/{project_id}/reports/punch-list        grouped preview
/// /projects/{project_id}/reports/punch-list/export grouped export
/// /projects/{project_id}/manual                    get, update
/// /projects/{project_id}/manual/attachments        upload document (POST)
/// /projects/{project_id}/manual/export             export
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    let upload_limit = multipart::body_limit_bytes(config.max_photo_size_mb);

    Router::new()
        // Reference data.
        .route("/areas/defaults", get(area::list_defaults))
        .route("/issues/categories", get(issue::list_categories))
        .route("/manual/sections", get(manual::list_sections))
        // Trade catalog and contractor directory.
        .nest("/trades", trade::router())
        .nest("/contractors", contractor::router())
        // Projects and everything scoped to one.
        .nest("/projects", project::router(upload_limit))
}
