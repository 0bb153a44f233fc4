//! Warehouse service: warehouse records, stock buckets, and the
//! append-only price history
//!
//! Price submissions never update in place; every call appends a dated row
//! and "prices as of D" picks the latest row with `effective_at <= D` per
//! item.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_price, PriceRecord, Warehouse, WarehouseStock};

/// Warehouse service
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Database row for a warehouse
#[derive(Debug, sqlx::FromRow)]
struct WarehouseRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    state: String,
    city: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        Warehouse {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            state: row.state,
            city: row.city,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a stock record
#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: Uuid,
    warehouse_id: Uuid,
    item_id: Uuid,
    virtual_quantity: Decimal,
    billed_quantity: Decimal,
    updated_at: DateTime<Utc>,
}

impl From<StockRow> for WarehouseStock {
    fn from(row: StockRow) -> Self {
        WarehouseStock {
            id: row.id,
            warehouse_id: row.warehouse_id,
            item_id: row.item_id,
            virtual_quantity: row.virtual_quantity,
            billed_quantity: row.billed_quantity,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a price record
#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: Uuid,
    warehouse_id: Uuid,
    item_id: Uuid,
    company_price: Decimal,
    rack_price: Decimal,
    depot_price: Decimal,
    plant_price: Decimal,
    effective_at: DateTime<Utc>,
}

impl From<PriceRow> for PriceRecord {
    fn from(row: PriceRow) -> Self {
        PriceRecord {
            id: row.id,
            warehouse_id: row.warehouse_id,
            item_id: row.item_id,
            company_price: row.company_price,
            rack_price: row.rack_price,
            depot_price: row.depot_price,
            plant_price: row.plant_price,
            effective_at: row.effective_at,
        }
    }
}

/// Input for creating a warehouse
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWarehouseInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
}

/// Input for updating a warehouse
#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseInput {
    pub name: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// Administrative stock adjustment for one (warehouse, item) row
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub virtual_quantity: Decimal,
    pub billed_quantity: Decimal,
}

/// One item's prices in a price update
#[derive(Debug, Deserialize)]
pub struct PriceInput {
    pub item_id: Uuid,
    pub company_price: Decimal,
    pub rack_price: Decimal,
    pub depot_price: Decimal,
    pub plant_price: Decimal,
}

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a warehouse
    pub async fn create(
        &self,
        organization_id: Uuid,
        input: CreateWarehouseInput,
    ) -> AppResult<Warehouse> {
        input.validate()?;

        let row = sqlx::query_as::<_, WarehouseRow>(
            r#"
            INSERT INTO warehouses (organization_id, name, state, city)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, name, state, city, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&input.name)
        .bind(&input.state)
        .bind(&input.city)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List warehouses for an organization
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, organization_id, name, state, city, created_at, updated_at
            FROM warehouses
            WHERE organization_id = $1
            ORDER BY name
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List warehouses filtered by state and/or city
    pub async fn filter(
        &self,
        organization_id: Uuid,
        state: Option<String>,
        city: Option<String>,
    ) -> AppResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, organization_id, name, state, city, created_at, updated_at
            FROM warehouses
            WHERE organization_id = $1
              AND ($2::TEXT IS NULL OR state = $2)
              AND ($3::TEXT IS NULL OR city = $3)
            ORDER BY name
            "#,
        )
        .bind(organization_id)
        .bind(state)
        .bind(city)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a warehouse by id
    pub async fn get(&self, organization_id: Uuid, warehouse_id: Uuid) -> AppResult<Warehouse> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, organization_id, name, state, city, created_at, updated_at
            FROM warehouses
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(warehouse_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(row.into())
    }

    /// Update a warehouse
    pub async fn update(
        &self,
        organization_id: Uuid,
        warehouse_id: Uuid,
        input: UpdateWarehouseInput,
    ) -> AppResult<Warehouse> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            r#"
            UPDATE warehouses
            SET name = COALESCE($1, name),
                state = COALESCE($2, state),
                city = COALESCE($3, city),
                updated_at = now()
            WHERE id = $4 AND organization_id = $5
            RETURNING id, organization_id, name, state, city, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.state)
        .bind(&input.city)
        .bind(warehouse_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(row.into())
    }

    /// Delete a warehouse; rejected while any bargain or fulfillment
    /// references it
    pub async fn delete(&self, organization_id: Uuid, warehouse_id: Uuid) -> AppResult<()> {
        self.get(organization_id, warehouse_id).await?;

        let references = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM orders WHERE warehouse_id = $1)
                 + (SELECT COUNT(*) FROM bookings WHERE warehouse_id = $1)
                 + (SELECT COUNT(*) FROM purchases WHERE warehouse_id = $1)
                 + (SELECT COUNT(*) FROM sales WHERE warehouse_id = $1)
            "#,
        )
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?;

        if references > 0 {
            return Err(AppError::ReferencedEntity {
                resource: "Warehouse".to_string(),
                references,
            });
        }

        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM warehouse_prices WHERE warehouse_id = $1")
            .bind(warehouse_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM warehouse_stock WHERE warehouse_id = $1")
            .bind(warehouse_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM warehouses WHERE id = $1 AND organization_id = $2")
            .bind(warehouse_id)
            .bind(organization_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    /// List stock rows for a warehouse
    pub async fn list_stock(
        &self,
        organization_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<Vec<WarehouseStock>> {
        self.get(organization_id, warehouse_id).await?;

        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT id, warehouse_id, item_id, virtual_quantity, billed_quantity, updated_at
            FROM warehouse_stock
            WHERE warehouse_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Administrative stock adjustment: set both buckets of a
    /// (warehouse, item) row
    pub async fn adjust_stock(
        &self,
        organization_id: Uuid,
        warehouse_id: Uuid,
        item_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<WarehouseStock> {
        if input.virtual_quantity < Decimal::ZERO || input.billed_quantity < Decimal::ZERO {
            return Err(AppError::validation(
                "quantity",
                "Stock quantities cannot be negative",
            ));
        }

        self.get(organization_id, warehouse_id).await?;
        self.ensure_item(organization_id, item_id).await?;

        let row = sqlx::query_as::<_, StockRow>(
            r#"
            INSERT INTO warehouse_stock (warehouse_id, item_id, virtual_quantity, billed_quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (warehouse_id, item_id)
            DO UPDATE SET virtual_quantity = EXCLUDED.virtual_quantity,
                          billed_quantity = EXCLUDED.billed_quantity,
                          updated_at = now()
            RETURNING id, warehouse_id, item_id, virtual_quantity, billed_quantity, updated_at
            "#,
        )
        .bind(warehouse_id)
        .bind(item_id)
        .bind(input.virtual_quantity)
        .bind(input.billed_quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Append a dated price row per item; existing rows are never touched
    pub async fn update_prices(
        &self,
        organization_id: Uuid,
        warehouse_id: Uuid,
        prices: Vec<PriceInput>,
    ) -> AppResult<Vec<PriceRecord>> {
        if prices.is_empty() {
            return Err(AppError::validation("items", "At least one price row is required"));
        }
        for price in &prices {
            for value in [
                price.company_price,
                price.rack_price,
                price.depot_price,
                price.plant_price,
            ] {
                validate_price(value).map_err(|msg| AppError::validation("price", msg))?;
            }
        }

        self.get(organization_id, warehouse_id).await?;
        for price in &prices {
            self.ensure_item(organization_id, price.item_id).await?;
        }

        let mut tx = self.db.begin().await?;
        let mut records = Vec::with_capacity(prices.len());
        for price in prices {
            let row = sqlx::query_as::<_, PriceRow>(
                r#"
                INSERT INTO warehouse_prices (warehouse_id, item_id, company_price,
                                              rack_price, depot_price, plant_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, warehouse_id, item_id, company_price, rack_price,
                          depot_price, plant_price, effective_at
                "#,
            )
            .bind(warehouse_id)
            .bind(price.item_id)
            .bind(price.company_price)
            .bind(price.rack_price)
            .bind(price.depot_price)
            .bind(price.plant_price)
            .fetch_one(&mut *tx)
            .await?;
            records.push(row.into());
        }
        tx.commit().await?;

        Ok(records)
    }

    /// Per-item latest price row with `effective_at <= date` (now if omitted)
    pub async fn prices_as_of(
        &self,
        organization_id: Uuid,
        warehouse_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<PriceRecord>> {
        self.get(organization_id, warehouse_id).await?;

        let cutoff = match date {
            // Inclusive of the whole day
            Some(d) => d
                .succ_opt()
                .and_then(|next| next.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now),
            None => Utc::now(),
        };

        let rows = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT DISTINCT ON (item_id)
                   id, warehouse_id, item_id, company_price, rack_price,
                   depot_price, plant_price, effective_at
            FROM warehouse_prices
            WHERE warehouse_id = $1 AND effective_at < $2
            ORDER BY item_id, effective_at DESC
            "#,
        )
        .bind(warehouse_id)
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Full price history for one item at a warehouse, newest first
    pub async fn price_history(
        &self,
        organization_id: Uuid,
        warehouse_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<Vec<PriceRecord>> {
        self.get(organization_id, warehouse_id).await?;

        let rows = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT id, warehouse_id, item_id, company_price, rack_price,
                   depot_price, plant_price, effective_at
            FROM warehouse_prices
            WHERE warehouse_id = $1 AND item_id = $2
            ORDER BY effective_at DESC
            "#,
        )
        .bind(warehouse_id)
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Validate an item belongs to the organization
    async fn ensure_item(&self, organization_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = $1 AND organization_id = $2)",
        )
        .bind(item_id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Item".to_string()));
        }
        Ok(())
    }
}
