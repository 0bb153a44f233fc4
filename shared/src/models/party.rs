//! Party master-data models: buyers and manufacturers
//!
//! Both sides of the trade carry the same record shape; bookings reference
//! buyers, orders reference manufacturers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Postal address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A buyer or manufacturer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub company: String,
    pub address: Address,
    /// Validated GSTIN
    pub gst_number: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which side of the trade a party sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Buyer,
    Manufacturer,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyKind::Buyer => "buyer",
            PartyKind::Manufacturer => "manufacturer",
        }
    }
}
