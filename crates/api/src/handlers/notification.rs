//! Handlers that notify contractors about issues and pending work.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::contact::ensure_contact;
use bluetape_core::error::CoreError;
use bluetape_core::types::{DbId, Timestamp};
use bluetape_db::repositories::{ContractorRepo, IssuePhotoRepo, IssueRepo};
use bluetape_events::{DispatchReceipt, IssueNotice, ReminderNotice};
use serde::Serialize;

use crate::error::{not_found, AppResult};
use crate::handlers::assignment::ensure_assignment_exists;
use crate::handlers::issue::ensure_issue_exists;
use crate::handlers::project::ensure_project_exists;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of an issue notification.
#[derive(Debug, Serialize)]
pub struct IssueNotificationResult {
    pub issue_id: DbId,
    pub contractor_id: DbId,
    pub channels: DispatchReceipt,
    /// Set when at least one channel delivered (or simulated) the message.
    pub notification_sent_at: Option<Timestamp>,
}

/// Outcome of a pending-work reminder.
#[derive(Debug, Serialize)]
pub struct ReminderResult {
    pub assignment_id: DbId,
    pub contractor_id: DbId,
    pub pending_issues: i64,
    pub channels: DispatchReceipt,
}

/// POST /api/v1/projects/{project_id}/issues/{issue_id}/notify
///
/// Sends the issue to its contractor by email and/or SMS. Fails with
/// `MISSING_CONTACT_INFO` when the contractor has neither.
pub async fn notify_issue(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    let labeled = ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let issue = labeled.issue;

    let contractor_id = issue.contractor_id.ok_or_else(|| {
        CoreError::Validation(format!("Issue {issue_id} has no contractor assigned"))
    })?;
    let contractor = ContractorRepo::find_by_id(&state.pool, contractor_id)
        .await?
        .ok_or_else(|| not_found("Contractor", contractor_id))?;
    let recipient = ensure_contact(
        contractor_id,
        contractor.email.as_deref(),
        contractor.phone.as_deref(),
    )?;

    let photo_urls = IssuePhotoRepo::list_for_issue(&state.pool, issue_id)
        .await?
        .into_iter()
        .map(|p| p.url)
        .collect();

    let notice = IssueNotice {
        issue_id,
        project_name: project.name,
        project_address: project.address,
        area_name: labeled.area_name,
        description: issue.description,
        priority: issue.priority,
        photo_urls,
        recipient,
    };
    let receipt = state.notifier.send_issue_notification(&notice).await;

    let notification_sent_at = if receipt.any_delivered() {
        IssueRepo::mark_notified(&state.pool, issue_id).await?;
        ensure_issue_exists(&state.pool, project_id, issue_id)
            .await?
            .issue
            .notification_sent_at
    } else {
        issue.notification_sent_at
    };

    tracing::info!(
        issue_id,
        contractor_id,
        delivered = receipt.any_delivered(),
        user_id = user.user_id,
        "Issue notification dispatched",
    );
    Ok(Json(DataResponse {
        data: IssueNotificationResult {
            issue_id,
            contractor_id,
            channels: receipt,
            notification_sent_at,
        },
    }))
}

/// POST /api/v1/projects/{project_id}/assignments/{assignment_id}/remind
///
/// Reminds the assigned contractor of their open work on this project.
pub async fn remind_contractor(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, assignment_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    let assignment = ensure_assignment_exists(&state.pool, project_id, assignment_id).await?;
    let contractor_id = assignment.assignment.contractor_id;

    let recipient = ensure_contact(
        contractor_id,
        assignment.email.as_deref(),
        assignment.phone.as_deref(),
    )?;
    let pending_issues =
        IssueRepo::count_pending_for_contractor(&state.pool, project_id, contractor_id).await?;

    let receipt = state
        .notifier
        .send_reminder(&ReminderNotice {
            project_name: project.name,
            pending_count: pending_issues,
            recipient,
        })
        .await;

    tracing::info!(
        project_id,
        contractor_id,
        pending_issues,
        user_id = user.user_id,
        "Contractor reminder dispatched",
    );
    Ok(Json(DataResponse {
        data: ReminderResult {
            assignment_id,
            contractor_id,
            pending_issues,
            channels: receipt,
        },
    }))
}
