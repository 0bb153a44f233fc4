//! Fulfillment event models: purchases against orders, sales against bookings

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Goods received into a warehouse against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    pub transport_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub lines: Vec<PurchaseLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quantity received for one order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// Goods dispatched from a warehouse against a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub booking_id: Uuid,
    pub warehouse_id: Uuid,
    pub transport_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub lines: Vec<SaleLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quantity dispatched for one booking line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
}
