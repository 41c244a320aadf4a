//! Repository for the `contractors` directory.

use bluetape_core::trade::ResolvedTrades;
use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::contractor::{
    Contractor, ContractorListFilter, CreateContractor, UpdateContractor,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company, contact_name, email, phone, primary_trade_id, trade_names, \
                       notes, is_active, created_at, updated_at";

/// Provides CRUD operations for contractors. "Delete" deactivates.
pub struct ContractorRepo;

impl ContractorRepo {
    /// Insert a contractor with trades already resolved by the selection shim.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContractor,
        trades: &ResolvedTrades,
    ) -> Result<Contractor, sqlx::Error> {
        let query = format!(
            "INSERT INTO contractors
                (company, contact_name, email, phone, primary_trade_id, trade_names, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(input.company.trim())
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(trades.primary_trade_id)
            .bind(&trades.trade_names)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a contractor by ID in any lifecycle state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contractor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contractors WHERE id = $1");
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a contractor with this ID exists (active or not).
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM contractors WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// List active contractors ordered by company.
    ///
    /// The trade filter matches the primary trade or a trade name in
    /// `trade_names`; an unknown trade id applies no filter.
    pub async fn list(
        pool: &PgPool,
        filter: &ContractorListFilter,
    ) -> Result<Vec<Contractor>, sqlx::Error> {
        let pattern = bluetape_core::search::contains_pattern(filter.search.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM contractors c
             WHERE c.is_active
               AND ($1::TEXT IS NULL OR c.company ILIKE $1 OR c.contact_name ILIKE $1)
               AND (
                    $2::BIGINT IS NULL
                    OR NOT EXISTS (SELECT 1 FROM trades WHERE id = $2)
                    OR c.primary_trade_id = $2
                    OR EXISTS (
                        SELECT 1 FROM trades t, UNNEST(c.trade_names) AS n(name)
                        WHERE t.id = $2 AND LOWER(n.name) = LOWER(t.name)
                    )
               )
             ORDER BY c.company, c.id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(&pattern)
            .bind(filter.trade_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Active contractors whose primary trade is `trade_id`.
    pub async fn list_active_for_trade(
        pool: &PgPool,
        trade_id: DbId,
    ) -> Result<Vec<Contractor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contractors
             WHERE primary_trade_id = $1 AND is_active
             ORDER BY company, id"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(trade_id)
            .fetch_all(pool)
            .await
    }

    /// Update a contractor. Only non-`None` fields are applied; when `trades`
    /// is `Some`, both `primary_trade_id` and `trade_names` are replaced.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContractor,
        trades: Option<&ResolvedTrades>,
    ) -> Result<Option<Contractor>, sqlx::Error> {
        let query = format!(
            "UPDATE contractors SET
                company = COALESCE($2, company),
                contact_name = COALESCE($3, contact_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                notes = COALESCE($6, notes),
                is_active = COALESCE($7, is_active),
                primary_trade_id = CASE WHEN $8::BOOLEAN THEN $9::BIGINT ELSE primary_trade_id END,
                trade_names = CASE WHEN $8::BOOLEAN THEN $10::TEXT[] ELSE trade_names END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contractor>(&query)
            .bind(id)
            .bind(input.company.as_deref().map(str::trim))
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .bind(input.is_active)
            .bind(trades.is_some())
            .bind(trades.and_then(|t| t.primary_trade_id))
            .bind(trades.map(|t| t.trade_names.clone()).unwrap_or_default())
            .fetch_optional(pool)
            .await
    }

    /// Mark a contractor inactive. Assignments are untouched. Returns `true`
    /// if the contractor exists.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE contractors SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
