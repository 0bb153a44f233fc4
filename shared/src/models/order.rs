//! Order (procurement bargain) models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BargainStatus, BillType, TransportCategory};

/// A procurement bargain against a manufacturer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Unique bargain number within the organization
    pub company_bargain_no: String,
    pub bargain_date: NaiveDate,
    pub manufacturer_id: Uuid,
    pub warehouse_id: Uuid,
    pub transport_category: TransportCategory,
    pub payment_due_date: NaiveDate,
    pub bill_type: BillType,
    pub status: BargainStatus,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One item line of an order
///
/// `fulfilled_quantity` only ever grows, bounded by `ordered_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub ordered_quantity: Decimal,
    pub fulfilled_quantity: Decimal,
}
