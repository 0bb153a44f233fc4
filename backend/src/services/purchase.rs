//! Purchase recording: the inbound half of the fulfillment workflow
//!
//! Recording a purchase is one transaction that inserts the purchase and its
//! lines, advances the matching order lines, credits the warehouse stock
//! bucket selected by the order's bill type, appends movement log rows, and
//! recomputes the order status. The order-line increment is a conditional
//! update; a zero row count means the quantity would overshoot the order and
//! the whole transaction rolls back.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    compute_status, validate_positive_quantity, BargainStatus, BillType, DestinationType,
    InventoryType, LineProgress, Purchase, PurchaseLine, SourceType,
};

/// Purchase service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Database row for a purchase header
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    organization_id: Uuid,
    order_id: Uuid,
    warehouse_id: Uuid,
    transport_id: Uuid,
    invoice_number: String,
    invoice_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn into_purchase(self, lines: Vec<PurchaseLine>) -> Purchase {
        Purchase {
            id: self.id,
            organization_id: self.organization_id,
            order_id: self.order_id,
            warehouse_id: self.warehouse_id,
            transport_id: self.transport_id,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database row for a purchase line
#[derive(Debug, sqlx::FromRow)]
struct PurchaseLineRow {
    id: Uuid,
    purchase_id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
}

impl From<PurchaseLineRow> for PurchaseLine {
    fn from(row: PurchaseLineRow) -> Self {
        PurchaseLine {
            id: row.id,
            purchase_id: row.purchase_id,
            item_id: row.item_id,
            quantity: row.quantity,
        }
    }
}

/// One received item line
#[derive(Debug, Deserialize)]
pub struct PurchaseLineInput {
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// Input for recording a purchase against an order
#[derive(Debug, Deserialize, Validate)]
pub struct RecordPurchaseInput {
    pub order_id: Uuid,
    pub warehouse_id: Uuid,
    pub transport_id: Uuid,
    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub lines: Vec<PurchaseLineInput>,
}

/// Invoice metadata update; lines and quantities are immutable once recorded
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseInput {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub transport_id: Option<Uuid>,
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record goods received against an order
    pub async fn record(
        &self,
        organization_id: Uuid,
        input: RecordPurchaseInput,
    ) -> AppResult<Purchase> {
        input.validate()?;

        if input.lines.is_empty() {
            return Err(AppError::validation("lines", "At least one line is required"));
        }
        for line in &input.lines {
            validate_positive_quantity(line.quantity)
                .map_err(|msg| AppError::validation("quantity", msg))?;
        }

        let order = sqlx::query_as::<_, (Uuid, String, String)>(
            r#"
            SELECT manufacturer_id, bill_type, status
            FROM orders
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(input.order_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
        let (manufacturer_id, bill_type, status) = order;

        let bill_type = BillType::parse(&bill_type)
            .ok_or_else(|| AppError::Service(format!("unknown bill type '{bill_type}'")))?;
        let status = BargainStatus::parse(&status)
            .ok_or_else(|| AppError::Service(format!("unknown status '{status}'")))?;
        if status == BargainStatus::Complete {
            return Err(AppError::InvalidStateTransition(
                "Order is already fully fulfilled".to_string(),
            ));
        }

        let warehouse_ok = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1 AND organization_id = $2)",
        )
        .bind(input.warehouse_id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;
        if !warehouse_ok {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        let transport_ok = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM transports WHERE id = $1 AND organization_id = $2)",
        )
        .bind(input.transport_id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;
        if !transport_ok {
            return Err(AppError::NotFound("Transport".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let header = sqlx::query_as::<_, PurchaseRow>(
            r#"
            INSERT INTO purchases (organization_id, order_id, warehouse_id, transport_id,
                                   invoice_number, invoice_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organization_id, order_id, warehouse_id, transport_id,
                      invoice_number, invoice_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(input.order_id)
        .bind(input.warehouse_id)
        .bind(input.transport_id)
        .bind(&input.invoice_number)
        .bind(input.invoice_date)
        .fetch_one(&mut *tx)
        .await?;

        let inventory_type = match bill_type {
            BillType::Billed => InventoryType::Billed,
            BillType::VirtualBilled => InventoryType::Virtual,
        };
        // Billed goods arrive from the manufacturer; virtual-billed goods are
        // attributed to the order itself until billing catches up.
        let (source_type, source_id) = match bill_type {
            BillType::Billed => (SourceType::Manufacturer, manufacturer_id),
            BillType::VirtualBilled => (SourceType::Order, input.order_id),
        };

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            // Guarded increment: fails when the item is not on the order or
            // the received quantity would exceed what was ordered.
            let advanced = sqlx::query(
                r#"
                UPDATE order_lines
                SET fulfilled_quantity = fulfilled_quantity + $1
                WHERE order_id = $2 AND item_id = $3
                  AND fulfilled_quantity + $1 <= ordered_quantity
                "#,
            )
            .bind(line.quantity)
            .bind(input.order_id)
            .bind(line.item_id)
            .execute(&mut *tx)
            .await?;

            if advanced.rows_affected() != 1 {
                return Err(AppError::validation(
                    "quantity",
                    "Received quantity exceeds the remaining ordered quantity",
                ));
            }

            let row = sqlx::query_as::<_, PurchaseLineRow>(
                r#"
                INSERT INTO purchase_lines (purchase_id, item_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, purchase_id, item_id, quantity
                "#,
            )
            .bind(header.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;

            credit_stock(&mut tx, input.warehouse_id, line.item_id, line.quantity, bill_type)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO inventory_movements (organization_id, item_id, quantity,
                                                 inventory_type, source_type, source_id,
                                                 destination_type, destination_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(organization_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(inventory_type.as_str())
            .bind(source_type.as_str())
            .bind(source_id)
            .bind(DestinationType::Warehouse.as_str())
            .bind(input.warehouse_id)
            .execute(&mut *tx)
            .await?;

            lines.push(row.into());
        }

        refresh_order_status(&mut tx, input.order_id).await?;

        tx.commit().await?;

        Ok(header.into_purchase(lines))
    }

    /// List purchases for an organization, newest first
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, organization_id, order_id, warehouse_id, transport_id,
                   invoice_number, invoice_date, created_at, updated_at
            FROM purchases
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        self.attach_lines(rows).await
    }

    /// List purchases recorded against one order
    pub async fn list_by_order(
        &self,
        organization_id: Uuid,
        order_id: Uuid,
    ) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, organization_id, order_id, warehouse_id, transport_id,
                   invoice_number, invoice_date, created_at, updated_at
            FROM purchases
            WHERE organization_id = $1 AND order_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        self.attach_lines(rows).await
    }

    /// Get a purchase with its lines
    pub async fn get(&self, organization_id: Uuid, purchase_id: Uuid) -> AppResult<Purchase> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, organization_id, order_id, warehouse_id, transport_id,
                   invoice_number, invoice_date, created_at, updated_at
            FROM purchases
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(purchase_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let lines = self.load_lines(purchase_id).await?;
        Ok(row.into_purchase(lines))
    }

    /// Update invoice metadata on a purchase
    pub async fn update(
        &self,
        organization_id: Uuid,
        purchase_id: Uuid,
        input: UpdatePurchaseInput,
    ) -> AppResult<Purchase> {
        if let Some(transport_id) = input.transport_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM transports WHERE id = $1 AND organization_id = $2)",
            )
            .bind(transport_id)
            .bind(organization_id)
            .fetch_one(&self.db)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Transport".to_string()));
            }
        }

        let row = sqlx::query_as::<_, PurchaseRow>(
            r#"
            UPDATE purchases
            SET invoice_number = COALESCE($1, invoice_number),
                invoice_date = COALESCE($2, invoice_date),
                transport_id = COALESCE($3, transport_id),
                updated_at = now()
            WHERE id = $4 AND organization_id = $5
            RETURNING id, organization_id, order_id, warehouse_id, transport_id,
                      invoice_number, invoice_date, created_at, updated_at
            "#,
        )
        .bind(&input.invoice_number)
        .bind(input.invoice_date)
        .bind(input.transport_id)
        .bind(purchase_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let lines = self.load_lines(purchase_id).await?;
        Ok(row.into_purchase(lines))
    }

    async fn attach_lines(&self, rows: Vec<PurchaseRow>) -> AppResult<Vec<Purchase>> {
        let mut purchases = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.load_lines(row.id).await?;
            purchases.push(row.into_purchase(lines));
        }
        Ok(purchases)
    }

    async fn load_lines(&self, purchase_id: Uuid) -> AppResult<Vec<PurchaseLine>> {
        let rows = sqlx::query_as::<_, PurchaseLineRow>(
            r#"
            SELECT id, purchase_id, item_id, quantity
            FROM purchase_lines
            WHERE purchase_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Credit the stock bucket selected by the bill type, creating the stock
/// row on first receipt.
async fn credit_stock(
    tx: &mut Transaction<'_, Postgres>,
    warehouse_id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
    bill_type: BillType,
) -> AppResult<()> {
    let (virtual_delta, billed_delta) = match bill_type {
        BillType::VirtualBilled => (quantity, Decimal::ZERO),
        BillType::Billed => (Decimal::ZERO, quantity),
    };

    sqlx::query(
        r#"
        INSERT INTO warehouse_stock (warehouse_id, item_id, virtual_quantity, billed_quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (warehouse_id, item_id)
        DO UPDATE SET virtual_quantity = warehouse_stock.virtual_quantity + EXCLUDED.virtual_quantity,
                      billed_quantity = warehouse_stock.billed_quantity + EXCLUDED.billed_quantity,
                      updated_at = now()
        "#,
    )
    .bind(warehouse_id)
    .bind(item_id)
    .bind(virtual_delta)
    .bind(billed_delta)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Recompute an order's status from its line progress inside the caller's
/// transaction.
pub(crate) async fn refresh_order_status(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> AppResult<BargainStatus> {
    let progress = sqlx::query_as::<_, (Decimal, Decimal)>(
        "SELECT ordered_quantity, fulfilled_quantity FROM order_lines WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?
    .into_iter()
    .map(|(ordered, fulfilled)| LineProgress { ordered, fulfilled })
    .collect::<Vec<_>>();

    let status = compute_status(&progress);

    sqlx::query("UPDATE orders SET status = $1, updated_at = now() WHERE id = $2")
        .bind(status.as_str())
        .bind(order_id)
        .execute(&mut **tx)
        .await?;

    Ok(status)
}
