//! Booking (sales bargain) models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Address, BargainStatus, BillType};

/// A sales bargain against a buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Unique bargain number within the organization
    pub bargain_no: String,
    pub bargain_date: NaiveDate,
    pub buyer_id: Uuid,
    pub warehouse_id: Uuid,
    pub delivery_option: DeliveryOption,
    /// Required when `delivery_option` is `delivery`
    pub delivery_address: Option<Address>,
    pub validity_days: i32,
    pub bill_type: BillType,
    pub status: BargainStatus,
    pub lines: Vec<BookingLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One item line of a booking
///
/// Sold-so-far is split into bill-type buckets; the sum of both buckets
/// never exceeds `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLine {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub virtual_quantity: Decimal,
    pub billed_quantity: Decimal,
}

impl BookingLine {
    /// Total sold across both bill-type buckets
    pub fn sold_quantity(&self) -> Decimal {
        self.virtual_quantity + self.billed_quantity
    }
}

/// How sold goods leave the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOption {
    Delivery,
    Pickup,
}

impl DeliveryOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOption::Delivery => "delivery",
            DeliveryOption::Pickup => "pickup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "delivery" => Some(DeliveryOption::Delivery),
            "pickup" => Some(DeliveryOption::Pickup),
            _ => None,
        }
    }
}
