//! Transport master-data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transporter referenced by purchases and sales
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    /// Free text, e.g. "truck"
    pub transport_type: String,
    pub agency: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
