//! Route definitions for the `/projects` resource.
//!
//! Areas, assignments, issues, photos, reports and the manual are all
//! nested under `/projects/{project_id}/...`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{area, assignment, issue, manual, notification, photo, project, report};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// `upload_limit` is the request body limit, in bytes, for the multipart
/// upload routes.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /{project_id}                                  -> get_by_id
/// PUT    /{project_id}                                  -> update
/// DELETE /{project_id}                                  -> delete
///
/// GET    /{project_id}/areas                            -> list
/// POST   /{project_id}/areas                            -> create
/// PUT    /{project_id}/areas/reorder                    -> reorder
/// GET    /{project_id}/areas/{area_id}                  -> get_by_id
/// PUT    /{project_id}/areas/{area_id}                  -> update
/// DELETE /{project_id}/areas/{area_id}                  -> delete
///
/// GET    /{project_id}/assignments                      -> list
/// POST   /{project_id}/assignments                      -> create
/// GET    /{project_id}/assignments/{assignment_id}      -> get_by_id
/// PUT    /{project_id}/assignments/{assignment_id}      -> update
/// DELETE /{project_id}/assignments/{assignment_id}      -> delete
/// POST   /{project_id}/assignments/{assignment_id}/remind -> remind_contractor
///
/// GET    /{project_id}/issues                           -> list
/// POST   /{project_id}/issues                           -> create
/// GET    /{project_id}/issues/{issue_id}                -> get_by_id
/// PUT    /{project_id}/issues/{issue_id}                -> update
/// DELETE /{project_id}/issues/{issue_id}                -> delete
/// POST   /{project_id}/issues/{issue_id}/status         -> change_status
/// POST   /{project_id}/issues/{issue_id}/notify         -> notify_issue
/// GET    /{project_id}/issues/{issue_id}/photos         -> list
/// POST   /{project_id}/issues/{issue_id}/photos         -> upload (multipart)
/// DELETE /{project_id}/issues/{issue_id}/photos/{photo_id} -> delete
///
/// GET    /{project_id}/dashboard                        -> dashboard
/// GET    /{project_id}/reports/punch-list               -> punch_list
/// GET    /{project_id}/reports/punch-list/export        -> export_punch_list
///
/// GET    /{project_id}/manual                           -> get
/// PUT    /{project_id}/manual                           -> update
/// POST   /{project_id}/manual/attachments               -> upload_attachment (multipart)
/// GET    /{project_id}/manual/export                    -> export
/// ```
pub fn router(upload_limit: usize) -> Router<AppState> {
    let area_routes = Router::new()
        .route("/", get(area::list).post(area::create))
        .route("/reorder", put(area::reorder))
        .route(
            "/{area_id}",
            get(area::get_by_id).put(area::update).delete(area::delete),
        );

    let assignment_routes = Router::new()
        .route("/", get(assignment::list).post(assignment::create))
        .route(
            "/{assignment_id}",
            get(assignment::get_by_id)
                .put(assignment::update)
                .delete(assignment::delete),
        )
        .route(
            "/{assignment_id}/remind",
            post(notification::remind_contractor),
        );

    let issue_routes = Router::new()
        .route("/", get(issue::list).post(issue::create))
        .route(
            "/{issue_id}",
            get(issue::get_by_id).put(issue::update).delete(issue::delete),
        )
        .route("/{issue_id}/status", post(issue::change_status))
        .route("/{issue_id}/notify", post(notification::notify_issue))
        .route(
            "/{issue_id}/photos",
            get(photo::list)
                .post(photo::upload)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/{issue_id}/photos/{photo_id}",
            delete(photo::delete),
        );

    let report_routes = Router::new()
        .route("/punch-list", get(report::punch_list))
        .route("/punch-list/export", get(report::export_punch_list));

    let manual_routes = Router::new()
        .route("/", get(manual::get).put(manual::update))
        .route(
            "/attachments",
            post(manual::upload_attachment).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/export", get(manual::export));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project_id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{project_id}/dashboard", get(report::dashboard))
        .nest("/{project_id}/areas", area_routes)
        .nest("/{project_id}/assignments", assignment_routes)
        .nest("/{project_id}/issues", issue_routes)
        .nest("/{project_id}/reports", report_routes)
        .nest("/{project_id}/manual", manual_routes)
}
