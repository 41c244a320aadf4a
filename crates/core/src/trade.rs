//! Trade catalog defaults and the trade-selection shim.
//!
//! A contractor's trades are written in exactly one place: [`resolve_selection`]
//! turns either a list of catalog ids or a list of free-form names into the
//! `(primary_trade_id, trade_names)` pair stored on the contractor row.

use crate::error::CoreError;
use crate::types::DbId;

/// A seeded catalog entry: `(name, icon, order)`.
pub type DefaultTrade = (&'static str, &'static str, i32);

/// The catalog seed, in display order.
pub const DEFAULT_TRADES: &[DefaultTrade] = &[
    ("General", "🏗️", 1),
    ("Framing", "🪵", 2),
    ("Concrete", "🧱", 3),
    ("Electrical", "⚡", 4),
    ("Plumbing", "🔧", 5),
    ("HVAC", "❄️", 6),
    ("Flooring", "🪨", 7),
    ("Painting", "🎨", 8),
    ("Drywall", "📐", 9),
    ("Roofing", "🏠", 10),
    ("Windows/Doors", "🚪", 11),
    ("Cabinets", "🗄️", 12),
    ("Countertops", "🪨", 13),
    ("Appliances", "🔌", 14),
    ("Landscaping", "🌳", 15),
    ("Insulation", "🧊", 16),
    ("Siding", "🏢", 17),
    ("Gutters", "💧", 18),
    ("Cleaning", "🧹", 19),
];

/// Maximum length of a trade name.
pub const MAX_TRADE_NAME_LEN: usize = 100;

/// Case-insensitive trade name comparison.
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Trim and validate a trade name.
pub fn normalize_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Trade name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TRADE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Trade name must be at most {MAX_TRADE_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Minimal view of a catalog row needed to resolve selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRef {
    pub id: DbId,
    pub name: String,
}

/// How the caller chose a contractor's trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeSelection {
    Ids(Vec<DbId>),
    Names(Vec<String>),
}

impl TradeSelection {
    /// Pick the selection from a write payload. Ids win when both are given.
    ///
    /// Returns `None` when neither is present, meaning "leave trades alone".
    pub fn from_input(
        trade_ids: Option<Vec<DbId>>,
        trade_names: Option<Vec<String>>,
    ) -> Option<Self> {
        match (trade_ids, trade_names) {
            (Some(ids), _) => Some(Self::Ids(ids)),
            (None, Some(names)) => Some(Self::Names(names)),
            (None, None) => None,
        }
    }
}

/// The stored form of a contractor's trades.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTrades {
    pub primary_trade_id: Option<DbId>,
    pub trade_names: Vec<String>,
}

/// Resolve a selection against the catalog.
///
/// - `Ids`: each id is looked up in the given order; unknown ids are dropped.
///   The first resolved id becomes the primary trade.
/// - `Names`: names are trimmed and empty entries dropped. A name matching a
///   catalog trade takes the catalog spelling. The primary trade is the first
///   name that matches the catalog.
///
/// Duplicates (case-insensitive) are removed, keeping the first occurrence.
pub fn resolve_selection(selection: &TradeSelection, catalog: &[TradeRef]) -> ResolvedTrades {
    let mut resolved = ResolvedTrades::default();

    match selection {
        TradeSelection::Ids(ids) => {
            for id in ids {
                let Some(trade) = catalog.iter().find(|t| t.id == *id) else {
                    continue;
                };
                if push_unique(&mut resolved.trade_names, &trade.name)
                    && resolved.primary_trade_id.is_none()
                {
                    resolved.primary_trade_id = Some(trade.id);
                }
            }
        }
        TradeSelection::Names(names) => {
            for raw in names {
                let name = raw.trim();
                if name.is_empty() {
                    continue;
                }
                let matched = catalog.iter().find(|t| same_name(&t.name, name));
                let spelled = matched.map(|t| t.name.as_str()).unwrap_or(name);
                if push_unique(&mut resolved.trade_names, spelled)
                    && resolved.primary_trade_id.is_none()
                {
                    resolved.primary_trade_id = matched.map(|t| t.id);
                }
            }
        }
    }

    resolved
}

/// Catalog ids for stored trade names, skipping names not in the catalog.
pub fn derive_trade_ids(trade_names: &[String], catalog: &[TradeRef]) -> Vec<DbId> {
    trade_names
        .iter()
        .filter_map(|name| catalog.iter().find(|t| same_name(&t.name, name)))
        .map(|t| t.id)
        .collect()
}

fn push_unique(names: &mut Vec<String>, name: &str) -> bool {
    if names.iter().any(|n| same_name(n, name)) {
        return false;
    }
    names.push(name.to_string());
    true
}
