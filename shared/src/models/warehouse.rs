//! Warehouse models: the warehouse record, its stock buckets, and the
//! append-only price history

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A storage location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub state: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock held at a warehouse for one item, split by bill type
///
/// One row per (warehouse, item). Purchases feed the bucket matching the
/// order's bill type; sales draw it down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseStock {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub item_id: Uuid,
    pub virtual_quantity: Decimal,
    pub billed_quantity: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// One dated row of the warehouse price history
///
/// Price rows are never mutated; each price update appends a new row and
/// "prices as of date D" selects the latest row with `effective_at <= D`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub item_id: Uuid,
    pub company_price: Decimal,
    pub rack_price: Decimal,
    pub depot_price: Decimal,
    pub plant_price: Decimal,
    pub effective_at: DateTime<Utc>,
}
