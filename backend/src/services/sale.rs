//! Sale recording: the outbound half of the fulfillment workflow
//!
//! Recording a sale debits the warehouse stock bucket selected by the
//! booking's bill type, advances the matching booking-line bucket, appends
//! movement log rows, and recomputes the booking status, all in one
//! transaction. Both the stock debit and the line advance are conditional
//! updates; either one matching zero rows aborts the whole sale.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    compute_status, validate_positive_quantity, BargainStatus, BillType, DeliveryOption,
    DestinationType, InventoryType, LineProgress, Sale, SaleLine, SourceType,
};

/// Sale service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Database row for a sale header
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    organization_id: Uuid,
    booking_id: Uuid,
    warehouse_id: Uuid,
    transport_id: Uuid,
    invoice_number: String,
    invoice_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, lines: Vec<SaleLine>) -> Sale {
        Sale {
            id: self.id,
            organization_id: self.organization_id,
            booking_id: self.booking_id,
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

/// Database row for a sale line
#[derive(Debug, sqlx::FromRow)]
struct SaleLineRow {
    id: Uuid,
    sale_id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        SaleLine {
            id: row.id,
            sale_id: row.sale_id,
            item_id: row.item_id,
            quantity: row.quantity,
        }
    }
}

/// One dispatched item line
#[derive(Debug, Deserialize)]
pub struct SaleLineInput {
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// Input for recording a sale against a booking
#[derive(Debug, Deserialize, Validate)]
pub struct RecordSaleInput {
    pub booking_id: Uuid,
    pub warehouse_id: Uuid,
    pub transport_id: Uuid,
    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub lines: Vec<SaleLineInput>,
}

/// Invoice metadata update; lines and quantities are immutable once recorded
#[derive(Debug, Deserialize)]
pub struct UpdateSaleInput {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub transport_id: Option<Uuid>,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record goods dispatched against a booking
    pub async fn record(&self, organization_id: Uuid, input: RecordSaleInput) -> AppResult<Sale> {
        input.validate()?;

        if input.lines.is_empty() {
            return Err(AppError::validation("lines", "At least one line is required"));
        }
        for line in &input.lines {
            validate_positive_quantity(line.quantity)
                .map_err(|msg| AppError::validation("quantity", msg))?;
        }

        let booking = sqlx::query_as::<_, (Uuid, String, String, String)>(
            r#"
            SELECT buyer_id, delivery_option, bill_type, status
            FROM bookings
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(input.booking_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;
        let (buyer_id, delivery_option, bill_type, status) = booking;

        let delivery_option = DeliveryOption::parse(&delivery_option)
            .ok_or_else(|| AppError::Service(format!("unknown delivery option '{delivery_option}'")))?;
        let bill_type = BillType::parse(&bill_type)
            .ok_or_else(|| AppError::Service(format!("unknown bill type '{bill_type}'")))?;
        let status = BargainStatus::parse(&status)
            .ok_or_else(|| AppError::Service(format!("unknown status '{status}'")))?;
        if status == BargainStatus::Complete {
            return Err(AppError::InvalidStateTransition(
                "Booking is already fully fulfilled".to_string(),
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

        let header = sqlx::query_as::<_, SaleRow>(
            r#"
            INSERT INTO sales (organization_id, booking_id, warehouse_id, transport_id,
                               invoice_number, invoice_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organization_id, booking_id, warehouse_id, transport_id,
                      invoice_number, invoice_date, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(input.booking_id)
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
        // Delivered goods go out to the buyer; pickups are attributed to the
        // booking itself.
        let (destination_type, destination_id) = match delivery_option {
            DeliveryOption::Delivery => (DestinationType::Buyer, buyer_id),
            DeliveryOption::Pickup => (DestinationType::Booking, input.booking_id),
        };

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            // Guarded advance on the booking line's bucket: fails when the
            // item is not on the booking or the dispatch would exceed the
            // booked quantity.
            let advanced = match bill_type {
                BillType::VirtualBilled => {
                    sqlx::query(
                        r#"
                        UPDATE booking_lines
                        SET virtual_quantity = virtual_quantity + $1
                        WHERE booking_id = $2 AND item_id = $3
                          AND virtual_quantity + billed_quantity + $1 <= quantity
                        "#,
                    )
                }
                BillType::Billed => {
                    sqlx::query(
                        r#"
                        UPDATE booking_lines
                        SET billed_quantity = billed_quantity + $1
                        WHERE booking_id = $2 AND item_id = $3
                          AND virtual_quantity + billed_quantity + $1 <= quantity
                        "#,
                    )
                }
            }
            .bind(line.quantity)
            .bind(input.booking_id)
            .bind(line.item_id)
            .execute(&mut *tx)
            .await?;

            if advanced.rows_affected() != 1 {
                return Err(AppError::validation(
                    "quantity",
                    "Dispatched quantity exceeds the remaining booked quantity",
                ));
            }

            debit_stock(&mut tx, input.warehouse_id, line.item_id, line.quantity, bill_type)
                .await?;

            let row = sqlx::query_as::<_, SaleLineRow>(
                r#"
                INSERT INTO sale_lines (sale_id, item_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, sale_id, item_id, quantity
                "#,
            )
            .bind(header.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
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
            .bind(SourceType::Warehouse.as_str())
            .bind(input.warehouse_id)
            .bind(destination_type.as_str())
            .bind(destination_id)
            .execute(&mut *tx)
            .await?;

            lines.push(row.into());
        }

        refresh_booking_status(&mut tx, input.booking_id).await?;

        tx.commit().await?;

        Ok(header.into_sale(lines))
    }

    /// List sales for an organization, newest first
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, organization_id, booking_id, warehouse_id, transport_id,
                   invoice_number, invoice_date, created_at, updated_at
            FROM sales
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        self.attach_lines(rows).await
    }

    /// List sales recorded against one booking
    pub async fn list_by_booking(
        &self,
        organization_id: Uuid,
        booking_id: Uuid,
    ) -> AppResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, organization_id, booking_id, warehouse_id, transport_id,
                   invoice_number, invoice_date, created_at, updated_at
            FROM sales
            WHERE organization_id = $1 AND booking_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(booking_id)
        .fetch_all(&self.db)
        .await?;

        self.attach_lines(rows).await
    }

    /// Get a sale with its lines
    pub async fn get(&self, organization_id: Uuid, sale_id: Uuid) -> AppResult<Sale> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, organization_id, booking_id, warehouse_id, transport_id,
                   invoice_number, invoice_date, created_at, updated_at
            FROM sales
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(sale_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let lines = self.load_lines(sale_id).await?;
        Ok(row.into_sale(lines))
    }

    /// Update invoice metadata on a sale
    pub async fn update(
        &self,
        organization_id: Uuid,
        sale_id: Uuid,
        input: UpdateSaleInput,
    ) -> AppResult<Sale> {
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

        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            UPDATE sales
            SET invoice_number = COALESCE($1, invoice_number),
                invoice_date = COALESCE($2, invoice_date),
                transport_id = COALESCE($3, transport_id),
                updated_at = now()
            WHERE id = $4 AND organization_id = $5
            RETURNING id, organization_id, booking_id, warehouse_id, transport_id,
                      invoice_number, invoice_date, created_at, updated_at
            "#,
        )
        .bind(&input.invoice_number)
        .bind(input.invoice_date)
        .bind(input.transport_id)
        .bind(sale_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let lines = self.load_lines(sale_id).await?;
        Ok(row.into_sale(lines))
    }

    async fn attach_lines(&self, rows: Vec<SaleRow>) -> AppResult<Vec<Sale>> {
        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.load_lines(row.id).await?;
            sales.push(row.into_sale(lines));
        }
        Ok(sales)
    }

    async fn load_lines(&self, sale_id: Uuid) -> AppResult<Vec<SaleLine>> {
        let rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT id, sale_id, item_id, quantity
            FROM sale_lines
            WHERE sale_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Debit the stock bucket selected by the bill type; zero matched rows
/// means the bucket does not hold enough.
async fn debit_stock(
    tx: &mut Transaction<'_, Postgres>,
    warehouse_id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
    bill_type: BillType,
) -> AppResult<()> {
    let debited = match bill_type {
        BillType::VirtualBilled => {
            sqlx::query(
                r#"
                UPDATE warehouse_stock
                SET virtual_quantity = virtual_quantity - $1, updated_at = now()
                WHERE warehouse_id = $2 AND item_id = $3 AND virtual_quantity >= $1
                "#,
            )
        }
        BillType::Billed => {
            sqlx::query(
                r#"
                UPDATE warehouse_stock
                SET billed_quantity = billed_quantity - $1, updated_at = now()
                WHERE warehouse_id = $2 AND item_id = $3 AND billed_quantity >= $1
                "#,
            )
        }
    }
    .bind(quantity)
    .bind(warehouse_id)
    .bind(item_id)
    .execute(&mut **tx)
    .await?;

    if debited.rows_affected() != 1 {
        return Err(AppError::InsufficientInventory(format!(
            "Warehouse does not hold {} of the {} stock for this item",
            quantity,
            bill_type.as_str()
        )));
    }

    Ok(())
}

/// Recompute a booking's status from its line buckets inside the caller's
/// transaction.
pub(crate) async fn refresh_booking_status(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
) -> AppResult<BargainStatus> {
    let progress = sqlx::query_as::<_, (Decimal, Decimal, Decimal)>(
        "SELECT quantity, virtual_quantity, billed_quantity FROM booking_lines WHERE booking_id = $1",
    )
    .bind(booking_id)
    .fetch_all(&mut **tx)
    .await?
    .into_iter()
    .map(|(quantity, virtual_q, billed_q)| LineProgress {
        ordered: quantity,
        fulfilled: virtual_q + billed_q,
    })
    .collect::<Vec<_>>();

    let status = compute_status(&progress);

    sqlx::query("UPDATE bookings SET status = $1, updated_at = now() WHERE id = $2")
        .bind(status.as_str())
        .bind(booking_id)
        .execute(&mut **tx)
        .await?;

    Ok(status)
}
