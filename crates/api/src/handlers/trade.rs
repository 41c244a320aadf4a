//! Handlers for the trade catalog (`/trades`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::error::CoreError;
use bluetape_core::trade::normalize_name;
use bluetape_core::types::DbId;
use bluetape_db::models::trade::{CreateTrade, Trade, TradeWithContractors, UpdateTrade};
use bluetape_db::repositories::{ContractorRepo, TradeRepo};
use bluetape_db::DbPool;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_trade_exists(pool: &DbPool, id: DbId) -> AppResult<Trade> {
    TradeRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Trade", id))
}

/// Reject a name another trade already uses (case-insensitive).
async fn ensure_name_free(pool: &DbPool, name: &str, exclude_id: Option<DbId>) -> AppResult<()> {
    if TradeRepo::find_by_name(pool, name, exclude_id).await?.is_some() {
        return Err(CoreError::DuplicateName(name.to_string()).into());
    }
    Ok(())
}

/// GET /api/v1/trades
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let trades = TradeRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: trades }))
}

/// GET /api/v1/trades/names
pub async fn list_names(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let names = TradeRepo::active_names(&state.pool).await?;
    Ok(Json(DataResponse { data: names }))
}

/// GET /api/v1/trades/{id}
///
/// Includes the active contractors offering the trade.
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let trade = ensure_trade_exists(&state.pool, id).await?;
    let contractors = ContractorRepo::list_active_for_trade(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: TradeWithContractors {
            trade,
            contractor_count: contractors.len() as i64,
            contractors,
        },
    }))
}

/// POST /api/v1/trades
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateTrade>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let name = normalize_name(&input.name)?;
    ensure_name_free(&state.pool, &name, None).await?;

    let trade = TradeRepo::create(&state.pool, &CreateTrade { name, ..input }).await?;
    tracing::info!(trade_id = trade.id, name = %trade.name, "Trade created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: trade })))
}

/// PUT /api/v1/trades/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrade>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_trade_exists(&state.pool, id).await?;

    let name = input.name.as_deref().map(normalize_name).transpose()?;
    if let Some(name) = &name {
        ensure_name_free(&state.pool, name, Some(id)).await?;
    }

    let trade = TradeRepo::update(&state.pool, id, &UpdateTrade { name, ..input })
        .await?
        .ok_or_else(|| not_found("Trade", id))?;
    Ok(Json(DataResponse { data: trade }))
}

/// DELETE /api/v1/trades/{id}
///
/// Deactivates the trade. Contractors keep the name in their trade list.
pub async fn deactivate(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TradeRepo::deactivate(&state.pool, id).await? {
        tracing::info!(trade_id = id, "Trade deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Trade", id))
    }
}
