//! Handlers for the contractor directory (`/contractors`).
//!
//! Writes accept trades either as catalog ids or as names; both resolve to
//! the stored `(primary_trade_id, trade_names)` pair. Responses add the
//! derived `trade_ids`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::search::{
    clamp_limit, clamp_offset, DEFAULT_CONTRACTOR_LIMIT, MAX_CONTRACTOR_LIMIT,
};
use bluetape_core::trade::{derive_trade_ids, resolve_selection, TradeRef, TradeSelection};
use bluetape_core::types::DbId;
use bluetape_db::models::contractor::{
    Contractor, ContractorListFilter, ContractorResponse, CreateContractor, UpdateContractor,
};
use bluetape_db::repositories::{ContractorRepo, TradeRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /contractors`.
#[derive(Debug, Deserialize)]
pub struct ContractorListParams {
    pub search: Option<String>,
    pub trade_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn with_trade_ids(contractor: Contractor, catalog: &[TradeRef]) -> ContractorResponse {
    let trade_ids = derive_trade_ids(&contractor.trade_names, catalog);
    ContractorResponse {
        contractor,
        trade_ids,
    }
}

/// GET /api/v1/contractors
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ContractorListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ContractorListFilter {
        search: params.search,
        trade_id: params.trade_id,
        limit: clamp_limit(params.limit, DEFAULT_CONTRACTOR_LIMIT, MAX_CONTRACTOR_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let contractors = ContractorRepo::list(&state.pool, &filter).await?;
    let catalog = TradeRepo::catalog(&state.pool).await?;

    let data: Vec<_> = contractors
        .into_iter()
        .map(|c| with_trade_ids(c, &catalog))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/contractors/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contractor = ContractorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Contractor", id))?;
    let catalog = TradeRepo::catalog(&state.pool).await?;
    Ok(Json(DataResponse {
        data: with_trade_ids(contractor, &catalog),
    }))
}

/// POST /api/v1/contractors
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateContractor>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let catalog = TradeRepo::catalog(&state.pool).await?;
    let trades = TradeSelection::from_input(input.trade_ids.clone(), input.trade_names.clone())
        .map(|selection| resolve_selection(&selection, &catalog))
        .unwrap_or_default();

    let contractor = ContractorRepo::create(&state.pool, &input, &trades).await?;
    tracing::info!(
        contractor_id = contractor.id,
        trades = contractor.trade_names.len(),
        "Contractor created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: with_trade_ids(contractor, &catalog),
        }),
    ))
}

/// PUT /api/v1/contractors/{id}
///
/// Trades are replaced only when `trade_ids` or `trade_names` is present.
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContractor>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let catalog = TradeRepo::catalog(&state.pool).await?;
    let trades = TradeSelection::from_input(input.trade_ids.clone(), input.trade_names.clone())
        .map(|selection| resolve_selection(&selection, &catalog));

    let contractor = ContractorRepo::update(&state.pool, id, &input, trades.as_ref())
        .await?
        .ok_or_else(|| not_found("Contractor", id))?;
    Ok(Json(DataResponse {
        data: with_trade_ids(contractor, &catalog),
    }))
}

/// DELETE /api/v1/contractors/{id}
///
/// Deactivates the contractor. Existing assignments and issues keep the link.
pub async fn deactivate(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ContractorRepo::deactivate(&state.pool, id).await? {
        tracing::info!(contractor_id = id, "Contractor deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Contractor", id))
    }
}
