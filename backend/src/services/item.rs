//! Item master-data service
//!
//! Items become immutable once an order or booking line references them;
//! updates then require an explicit administrative correction, and deletes
//! are rejected outright.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_gst_rate, validate_price, Item, Packaging};

/// Item service
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// Database row for an item
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    organization_id: Uuid,
    material_code: String,
    description: String,
    packaging: String,
    net_weight: Decimal,
    gross_weight: Decimal,
    gst_rate: Decimal,
    pack_size: i32,
    static_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_item(self) -> AppResult<Item> {
        let packaging = Packaging::parse(&self.packaging)
            .ok_or_else(|| AppError::Service(format!("unknown packaging '{}'", self.packaging)))?;
        Ok(Item {
            id: self.id,
            organization_id: self.organization_id,
            material_code: self.material_code,
            description: self.description,
            packaging,
            net_weight: self.net_weight,
            gross_weight: self.gross_weight,
            gst_rate: self.gst_rate,
            pack_size: self.pack_size,
            static_price: self.static_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating an item
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 64, message = "Material code is required"))]
    pub material_code: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub packaging: Packaging,
    pub net_weight: Decimal,
    pub gross_weight: Decimal,
    pub gst_rate: Decimal,
    #[validate(range(min = 1, message = "Pack size must be at least 1"))]
    pub pack_size: i32,
    pub static_price: Decimal,
}

/// Input for updating an item
///
/// `administrative_correction` must be set to touch an item that is already
/// referenced by an order or booking line.
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub description: Option<String>,
    pub packaging: Option<Packaging>,
    pub net_weight: Option<Decimal>,
    pub gross_weight: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    pub pack_size: Option<i32>,
    pub static_price: Option<Decimal>,
    #[serde(default)]
    pub administrative_correction: bool,
}

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an item
    pub async fn create(&self, organization_id: Uuid, input: CreateItemInput) -> AppResult<Item> {
        input.validate()?;
        if input.net_weight <= Decimal::ZERO || input.gross_weight <= Decimal::ZERO {
            return Err(AppError::validation("net_weight", "Weights must be positive"));
        }
        validate_gst_rate(input.gst_rate).map_err(|msg| AppError::validation("gst_rate", msg))?;
        validate_price(input.static_price)
            .map_err(|msg| AppError::validation("static_price", msg))?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM items WHERE organization_id = $1 AND material_code = $2)",
        )
        .bind(organization_id)
        .bind(&input.material_code)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::Conflict {
                resource: "item".to_string(),
                message: format!(
                    "An item with material code '{}' already exists",
                    input.material_code
                ),
            });
        }

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (organization_id, material_code, description, packaging,
                               net_weight, gross_weight, gst_rate, pack_size, static_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, organization_id, material_code, description, packaging,
                      net_weight, gross_weight, gst_rate, pack_size, static_price,
                      created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&input.material_code)
        .bind(&input.description)
        .bind(input.packaging.as_str())
        .bind(input.net_weight)
        .bind(input.gross_weight)
        .bind(input.gst_rate)
        .bind(input.pack_size)
        .bind(input.static_price)
        .fetch_one(&self.db)
        .await?;

        row.into_item()
    }

    /// List items for an organization
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, organization_id, material_code, description, packaging,
                   net_weight, gross_weight, gst_rate, pack_size, static_price,
                   created_at, updated_at
            FROM items
            WHERE organization_id = $1
            ORDER BY material_code
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    /// Get an item by id
    pub async fn get(&self, organization_id: Uuid, item_id: Uuid) -> AppResult<Item> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, organization_id, material_code, description, packaging,
                   net_weight, gross_weight, gst_rate, pack_size, static_price,
                   created_at, updated_at
            FROM items
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(item_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        row.into_item()
    }

    /// Update an item
    ///
    /// Items referenced by any order or booking line are immutable unless
    /// the request is an administrative correction.
    pub async fn update(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<Item> {
        if let Some(gst_rate) = input.gst_rate {
            validate_gst_rate(gst_rate).map_err(|msg| AppError::validation("gst_rate", msg))?;
        }
        if let Some(price) = input.static_price {
            validate_price(price).map_err(|msg| AppError::validation("static_price", msg))?;
        }
        if matches!(input.net_weight, Some(w) if w <= Decimal::ZERO)
            || matches!(input.gross_weight, Some(w) if w <= Decimal::ZERO)
        {
            return Err(AppError::validation("net_weight", "Weights must be positive"));
        }
        if matches!(input.pack_size, Some(p) if p < 1) {
            return Err(AppError::validation("pack_size", "Pack size must be at least 1"));
        }

        // Existence check before the immutability rule so a missing item is 404
        self.get(organization_id, item_id).await?;

        let references = self.count_line_references(item_id).await?;
        if references > 0 && !input.administrative_correction {
            return Err(AppError::Conflict {
                resource: "item".to_string(),
                message: format!(
                    "Item is referenced by {} bargain line(s); set administrative_correction to update it",
                    references
                ),
            });
        }

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET description = COALESCE($1, description),
                packaging = COALESCE($2, packaging),
                net_weight = COALESCE($3, net_weight),
                gross_weight = COALESCE($4, gross_weight),
                gst_rate = COALESCE($5, gst_rate),
                pack_size = COALESCE($6, pack_size),
                static_price = COALESCE($7, static_price),
                updated_at = now()
            WHERE id = $8 AND organization_id = $9
            RETURNING id, organization_id, material_code, description, packaging,
                      net_weight, gross_weight, gst_rate, pack_size, static_price,
                      created_at, updated_at
            "#,
        )
        .bind(&input.description)
        .bind(input.packaging.map(|p| p.as_str()))
        .bind(input.net_weight)
        .bind(input.gross_weight)
        .bind(input.gst_rate)
        .bind(input.pack_size)
        .bind(input.static_price)
        .bind(item_id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;

        row.into_item()
    }

    /// Delete an item; rejected while any bargain line references it
    pub async fn delete(&self, organization_id: Uuid, item_id: Uuid) -> AppResult<()> {
        self.get(organization_id, item_id).await?;

        let references = self.count_line_references(item_id).await?;
        if references > 0 {
            return Err(AppError::ReferencedEntity {
                resource: "item".to_string(),
                references,
            });
        }

        // Stock and price rows are warehouse bookkeeping, not bargain
        // references; clear them with the item.
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM warehouse_prices WHERE item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM warehouse_stock WHERE item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM items WHERE id = $1 AND organization_id = $2")
            .bind(item_id)
            .bind(organization_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    /// Count order and booking lines referencing an item
    async fn count_line_references(&self, item_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM order_lines WHERE item_id = $1)
                 + (SELECT COUNT(*) FROM booking_lines WHERE item_id = $1)
            "#,
        )
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }
}
