//! Item (material) master-data model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tradeable material
///
/// Immutable once referenced by an order or booking line, except through
/// an explicit administrative correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Unique material code within the organization
    pub material_code: String,
    pub description: String,
    pub packaging: Packaging,
    pub net_weight: Decimal,
    pub gross_weight: Decimal,
    /// GST rate as a percentage
    pub gst_rate: Decimal,
    /// Units per pack
    pub pack_size: i32,
    pub static_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Packaging form of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Packaging {
    Box,
    Tin,
    Jar,
}

impl Packaging {
    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::Box => "box",
            Packaging::Tin => "tin",
            Packaging::Jar => "jar",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "box" => Some(Packaging::Box),
            "tin" => Some(Packaging::Tin),
            "jar" => Some(Packaging::Jar),
            _ => None,
        }
    }
}
