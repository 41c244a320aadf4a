//! Repository for the `trades` catalog.

use bluetape_core::trade::TradeRef;
use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::trade::{CreateTrade, Trade, TradeWithCount, UpdateTrade};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, icon, sort_order, is_active, created_at, updated_at";

/// Same columns qualified with the `t` alias, for joins.
const T_COLUMNS: &str = "t.id, t.name, t.description, t.icon, t.sort_order, t.is_active, \
                         t.created_at, t.updated_at";

/// Provides catalog operations for trades. Trades are never hard-deleted.
pub struct TradeRepo;

impl TradeRepo {
    /// List trades by `(order, name)` with live active-contractor counts.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<TradeWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS},
                    (SELECT COUNT(*) FROM contractors c
                      WHERE c.primary_trade_id = t.id AND c.is_active) AS contractor_count
             FROM trades t
             WHERE $1 OR t.is_active
             ORDER BY t.sort_order, t.name"
        );
        sqlx::query_as::<_, TradeWithCount>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Find a trade by ID regardless of lifecycle.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trade>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trades WHERE id = $1");
        sqlx::query_as::<_, Trade>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a trade whose name matches case-insensitively, optionally
    /// ignoring one trade (the one being renamed).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Trade>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trades
             WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(name.trim())
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
    }

    /// Every trade as an `(id, name)` pair, for resolving contractor selections.
    pub async fn catalog(pool: &PgPool) -> Result<Vec<TradeRef>, sqlx::Error> {
        let rows: Vec<(DbId, String)> =
            sqlx::query_as("SELECT id, name FROM trades ORDER BY sort_order, name")
                .fetch_all(pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| TradeRef { id, name })
            .collect())
    }

    /// Names of active trades in catalog order.
    pub async fn active_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM trades WHERE is_active ORDER BY sort_order, name")
            .fetch_all(pool)
            .await
    }

    /// Insert a trade. The caller checks for a name collision first; a race
    /// surfaces as a unique violation on `uq_trades_name_lower`.
    pub async fn create(pool: &PgPool, input: &CreateTrade) -> Result<Trade, sqlx::Error> {
        let query = format!(
            "INSERT INTO trades (name, description, icon, sort_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.order)
            .fetch_one(pool)
            .await
    }

    /// Update a trade. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrade,
    ) -> Result<Option<Trade>, sqlx::Error> {
        let query = format!(
            "UPDATE trades SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon),
                sort_order = COALESCE($5, sort_order),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Mark a trade inactive. Returns `true` if the trade exists.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE trades SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
