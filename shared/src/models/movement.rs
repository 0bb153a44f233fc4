//! Inventory movement log models
//!
//! Movements are the append-only audit trail behind the timeline view: one
//! immutable row per purchase/sale line, describing a quantity of an item
//! moving between two parties/locations. No operation updates or deletes
//! movement rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the inventory movement log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub inventory_type: InventoryType,
    pub source_type: SourceType,
    pub source_id: Uuid,
    pub destination_type: DestinationType,
    pub destination_id: Uuid,
    pub recorded_at: DateTime<Utc>,
}

/// Stock bucket a movement belongs to, derived from the bargain's bill type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryType {
    Virtual,
    Billed,
}

impl InventoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryType::Virtual => "virtual",
            InventoryType::Billed => "billed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "virtual" => Some(InventoryType::Virtual),
            "billed" => Some(InventoryType::Billed),
            _ => None,
        }
    }
}

/// Where the goods came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Manufacturer,
    Order,
    Warehouse,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Manufacturer => "manufacturer",
            SourceType::Order => "order",
            SourceType::Warehouse => "warehouse",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manufacturer" => Some(SourceType::Manufacturer),
            "order" => Some(SourceType::Order),
            "warehouse" => Some(SourceType::Warehouse),
            _ => None,
        }
    }
}

/// Where the goods went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    Warehouse,
    Buyer,
    Booking,
}

impl DestinationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::Warehouse => "warehouse",
            DestinationType::Buyer => "buyer",
            DestinationType::Booking => "booking",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "warehouse" => Some(DestinationType::Warehouse),
            "buyer" => Some(DestinationType::Buyer),
            "booking" => Some(DestinationType::Booking),
            _ => None,
        }
    }
}

/// Movements grouped by route for the timeline view
#[derive(Debug, Clone, Serialize)]
pub struct MovementGroup {
    pub source_type: SourceType,
    pub destination_type: DestinationType,
    pub total_quantity: Decimal,
    pub movements: Vec<InventoryMovement>,
}

/// Group movements by (source type, destination type), preserving the input
/// order within each group and the first-seen order across groups.
pub fn group_movements(movements: Vec<InventoryMovement>) -> Vec<MovementGroup> {
    let mut groups: Vec<MovementGroup> = Vec::new();
    for movement in movements {
        let key = (movement.source_type, movement.destination_type);
        match groups
            .iter_mut()
            .find(|g| (g.source_type, g.destination_type) == key)
        {
            Some(group) => {
                group.total_quantity += movement.quantity;
                group.movements.push(movement);
            }
            None => groups.push(MovementGroup {
                source_type: movement.source_type,
                destination_type: movement.destination_type,
                total_quantity: movement.quantity,
                movements: vec![movement],
            }),
        }
    }
    groups
}
