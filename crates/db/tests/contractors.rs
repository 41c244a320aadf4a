//! Trade catalog and contractor directory behaviour.

use bluetape_core::lifecycle::Lifecycle;
use bluetape_core::trade::{derive_trade_ids, resolve_selection, TradeSelection};
use bluetape_db::models::contractor::{ContractorListFilter, CreateContractor, UpdateContractor};
use bluetape_db::models::trade::{CreateTrade, UpdateTrade};
use bluetape_db::repositories::{ContractorRepo, TradeRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contractor(company: &str) -> CreateContractor {
    CreateContractor {
        company: company.to_string(),
        contact_name: Some("Pat".to_string()),
        email: None,
        phone: Some("+15550100".to_string()),
        trade_ids: None,
        trade_names: None,
        notes: None,
    }
}

async fn trade_id(pool: &PgPool, name: &str) -> i64 {
    TradeRepo::find_by_name(pool, name, None)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("{name} should be seeded"))
        .id
}

fn filter(trade_id: Option<i64>) -> ContractorListFilter {
    ContractorListFilter {
        search: None,
        trade_id,
        limit: 100,
        offset: 0,
    }
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn trade_names_are_unique_case_insensitively(pool: PgPool) {
    let err = TradeRepo::create(
        &pool,
        &CreateTrade {
            name: "electrical".to_string(),
            description: None,
            icon: None,
            order: 99,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_trades_name_lower"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_trades_hidden_by_default(pool: PgPool) {
    let id = trade_id(&pool, "Landscaping").await;
    assert!(TradeRepo::deactivate(&pool, id).await.unwrap());

    let active = TradeRepo::list(&pool, false).await.unwrap();
    assert!(active.iter().all(|t| t.trade.id != id));

    let all = TradeRepo::list(&pool, true).await.unwrap();
    let landscaping = all.iter().find(|t| t.trade.id == id).unwrap();
    assert_eq!(landscaping.trade.lifecycle, Lifecycle::Deactivated);

    let revived = TradeRepo::update(
        &pool,
        id,
        &UpdateTrade {
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(revived.lifecycle.is_active());
}

// ---------------------------------------------------------------------------
// Contractors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn trade_ids_resolve_to_names_with_primary(pool: PgPool) {
    let catalog = TradeRepo::catalog(&pool).await.unwrap();
    let plumbing = trade_id(&pool, "Plumbing").await;
    let hvac = trade_id(&pool, "HVAC").await;

    let resolved = resolve_selection(&TradeSelection::Ids(vec![plumbing, hvac]), &catalog);
    let created = ContractorRepo::create(&pool, &contractor("Flow Co"), &resolved)
        .await
        .unwrap();

    assert_eq!(created.primary_trade_id, Some(plumbing));
    assert_eq!(created.trade_names, vec!["Plumbing".to_string(), "HVAC".to_string()]);
    assert_eq!(derive_trade_ids(&created.trade_names, &catalog), vec![plumbing, hvac]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_primary_or_listed_trade(pool: PgPool) {
    let catalog = TradeRepo::catalog(&pool).await.unwrap();
    let electrical = trade_id(&pool, "Electrical").await;

    let primary = resolve_selection(
        &TradeSelection::Names(vec!["electrical".to_string()]),
        &catalog,
    );
    let secondary = resolve_selection(
        &TradeSelection::Names(vec!["Drywall".to_string(), "Electrical".to_string()]),
        &catalog,
    );
    let unrelated = resolve_selection(&TradeSelection::Names(vec!["Roofing".to_string()]), &catalog);

    let a = ContractorRepo::create(&pool, &contractor("Amp Works"), &primary).await.unwrap();
    let b = ContractorRepo::create(&pool, &contractor("Board & Wire"), &secondary).await.unwrap();
    ContractorRepo::create(&pool, &contractor("Top Roof"), &unrelated).await.unwrap();

    let listed = ContractorRepo::list(&pool, &filter(Some(electrical))).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);

    // Unknown trade id applies no filter.
    let listed = ContractorRepo::list(&pool, &filter(Some(9_999_999))).await.unwrap();
    assert_eq!(listed.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_trades_keeps_them(pool: PgPool) {
    let catalog = TradeRepo::catalog(&pool).await.unwrap();
    let resolved = resolve_selection(&TradeSelection::Names(vec!["Flooring".to_string()]), &catalog);
    let created = ContractorRepo::create(&pool, &contractor("Plank"), &resolved).await.unwrap();

    let input = UpdateContractor {
        notes: Some("Prefers mornings".to_string()),
        ..Default::default()
    };
    let updated = ContractorRepo::update(&pool, created.id, &input, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.trade_names, created.trade_names);
    assert_eq!(updated.primary_trade_id, created.primary_trade_id);
    assert_eq!(updated.notes.as_deref(), Some("Prefers mornings"));

    let cleared = resolve_selection(&TradeSelection::Ids(vec![]), &catalog);
    let updated = ContractorRepo::update(&pool, created.id, &UpdateContractor::default(), Some(&cleared))
        .await
        .unwrap()
        .unwrap();
    assert!(updated.trade_names.is_empty());
    assert!(updated.primary_trade_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_contractor_leaves_listing(pool: PgPool) {
    let created = ContractorRepo::create(&pool, &contractor("Retiring"), &Default::default())
        .await
        .unwrap();
    assert!(ContractorRepo::deactivate(&pool, created.id).await.unwrap());

    assert!(ContractorRepo::list(&pool, &filter(None)).await.unwrap().is_empty());
    let row = ContractorRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(row.lifecycle, Lifecycle::Deactivated);
}
