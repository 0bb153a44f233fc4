//! Order (procurement bargain) service
//!
//! Orders are created with a fixed set of item lines; fulfillment only ever
//! grows `fulfilled_quantity` through purchases. Bill type can be switched
//! only while the order is still in `created` status.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    validate_positive_quantity, BargainStatus, BillType, Order, OrderLine, TransportCategory,
};

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Database row for an order header
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    organization_id: Uuid,
    company_bargain_no: String,
    bargain_date: NaiveDate,
    manufacturer_id: Uuid,
    warehouse_id: Uuid,
    transport_category: String,
    payment_due_date: NaiveDate,
    bill_type: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> AppResult<Order> {
        let transport_category = TransportCategory::parse(&self.transport_category).ok_or_else(
            || AppError::Service(format!("unknown transport category '{}'", self.transport_category)),
        )?;
        let bill_type = BillType::parse(&self.bill_type)
            .ok_or_else(|| AppError::Service(format!("unknown bill type '{}'", self.bill_type)))?;
        let status = BargainStatus::parse(&self.status)
            .ok_or_else(|| AppError::Service(format!("unknown status '{}'", self.status)))?;
        Ok(Order {
            id: self.id,
            organization_id: self.organization_id,
            company_bargain_no: self.company_bargain_no,
            bargain_date: self.bargain_date,
            manufacturer_id: self.manufacturer_id,
            warehouse_id: self.warehouse_id,
            transport_category,
            payment_due_date: self.payment_due_date,
            bill_type,
            status,
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for an order line
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: Uuid,
    order_id: Uuid,
    item_id: Uuid,
    ordered_quantity: Decimal,
    fulfilled_quantity: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        OrderLine {
            id: row.id,
            order_id: row.order_id,
            item_id: row.item_id,
            ordered_quantity: row.ordered_quantity,
            fulfilled_quantity: row.fulfilled_quantity,
        }
    }
}

/// One item line of a new order
#[derive(Debug, Deserialize)]
pub struct OrderLineInput {
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// Input for creating an order
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    #[validate(length(min = 1, message = "Bargain number is required"))]
    pub company_bargain_no: String,
    pub bargain_date: NaiveDate,
    pub manufacturer_id: Uuid,
    pub warehouse_id: Uuid,
    pub transport_category: TransportCategory,
    pub payment_due_date: NaiveDate,
    pub bill_type: BillType,
    pub lines: Vec<OrderLineInput>,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order with its item lines
    pub async fn create(&self, organization_id: Uuid, input: CreateOrderInput) -> AppResult<Order> {
        input.validate()?;

        if input.lines.is_empty() {
            return Err(AppError::validation("lines", "At least one line is required"));
        }
        for line in &input.lines {
            validate_positive_quantity(line.quantity)
                .map_err(|msg| AppError::validation("quantity", msg))?;
        }
        let mut seen: Vec<Uuid> = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            if seen.contains(&line.item_id) {
                return Err(AppError::validation(
                    "lines",
                    "An item may appear on at most one line",
                ));
            }
            seen.push(line.item_id);
        }

        self.ensure_exists(
            "manufacturers",
            "Manufacturer",
            organization_id,
            input.manufacturer_id,
        )
        .await?;
        self.ensure_exists("warehouses", "Warehouse", organization_id, input.warehouse_id)
            .await?;
        for line in &input.lines {
            self.ensure_exists("items", "Item", organization_id, line.item_id)
                .await?;
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE organization_id = $1 AND company_bargain_no = $2)",
        )
        .bind(organization_id)
        .bind(&input.company_bargain_no)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::Conflict {
                resource: "order".to_string(),
                message: format!(
                    "Bargain number '{}' is already in use",
                    input.company_bargain_no
                ),
            });
        }

        let mut tx = self.db.begin().await?;

        let header = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (organization_id, company_bargain_no, bargain_date,
                                manufacturer_id, warehouse_id, transport_category,
                                payment_due_date, bill_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, organization_id, company_bargain_no, bargain_date,
                      manufacturer_id, warehouse_id, transport_category,
                      payment_due_date, bill_type, status, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&input.company_bargain_no)
        .bind(input.bargain_date)
        .bind(input.manufacturer_id)
        .bind(input.warehouse_id)
        .bind(input.transport_category.as_str())
        .bind(input.payment_due_date)
        .bind(input.bill_type.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let row = sqlx::query_as::<_, OrderLineRow>(
                r#"
                INSERT INTO order_lines (order_id, item_id, ordered_quantity)
                VALUES ($1, $2, $3)
                RETURNING id, order_id, item_id, ordered_quantity, fulfilled_quantity
                "#,
            )
            .bind(header.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(row.into());
        }

        tx.commit().await?;

        header.into_order(lines)
    }

    /// List orders for an organization, newest bargain first
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, organization_id, company_bargain_no, bargain_date,
                   manufacturer_id, warehouse_id, transport_category,
                   payment_due_date, bill_type, status, created_at, updated_at
            FROM orders
            WHERE organization_id = $1
            ORDER BY bargain_date DESC, created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.load_lines(row.id).await?;
            orders.push(row.into_order(lines)?);
        }
        Ok(orders)
    }

    /// Get an order with its lines
    pub async fn get(&self, organization_id: Uuid, order_id: Uuid) -> AppResult<Order> {
        let row = self.load_header(organization_id, order_id).await?;
        let lines = self.load_lines(order_id).await?;
        row.into_order(lines)
    }

    /// Switch an order's bill type; only allowed while nothing has been
    /// fulfilled yet
    pub async fn update_bill_type(
        &self,
        organization_id: Uuid,
        order_id: Uuid,
        bill_type: BillType,
    ) -> AppResult<Order> {
        let row = self.load_header(organization_id, order_id).await?;
        let status = BargainStatus::parse(&row.status)
            .ok_or_else(|| AppError::Service(format!("unknown status '{}'", row.status)))?;
        if status != BargainStatus::Created {
            return Err(AppError::Conflict {
                resource: "order".to_string(),
                message: "Bill type can only change before any purchase is recorded".to_string(),
            });
        }

        let updated = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders
            SET bill_type = $1, updated_at = now()
            WHERE id = $2 AND organization_id = $3
            RETURNING id, organization_id, company_bargain_no, bargain_date,
                      manufacturer_id, warehouse_id, transport_category,
                      payment_due_date, bill_type, status, created_at, updated_at
            "#,
        )
        .bind(bill_type.as_str())
        .bind(order_id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;

        let lines = self.load_lines(order_id).await?;
        updated.into_order(lines)
    }

    /// Delete an order; rejected once any purchase references it
    pub async fn delete(&self, organization_id: Uuid, order_id: Uuid) -> AppResult<()> {
        self.load_header(organization_id, order_id).await?;

        let references = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchases WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        if references > 0 {
            return Err(AppError::ReferencedEntity {
                resource: "Order".to_string(),
                references,
            });
        }

        sqlx::query("DELETE FROM orders WHERE id = $1 AND organization_id = $2")
            .bind(order_id)
            .bind(organization_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn load_header(&self, organization_id: Uuid, order_id: Uuid) -> AppResult<OrderRow> {
        sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, organization_id, company_bargain_no, bargain_date,
                   manufacturer_id, warehouse_id, transport_category,
                   payment_due_date, bill_type, status, created_at, updated_at
            FROM orders
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(order_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    async fn load_lines(&self, order_id: Uuid) -> AppResult<Vec<OrderLine>> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT id, order_id, item_id, ordered_quantity, fulfilled_quantity
            FROM order_lines
            WHERE order_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ensure_exists(
        &self,
        table: &str,
        resource: &str,
        organization_id: Uuid,
        id: Uuid,
    ) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND organization_id = $2)"
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound(resource.to_string()));
        }
        Ok(())
    }
}
