//! Booking (sales bargain) service
//!
//! Bookings mirror orders on the sales side. Each line tracks sold
//! quantities in two bill-type buckets whose sum is bounded by the booked
//! quantity.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    validate_pincode, validate_positive_quantity, Address, BargainStatus, BillType, Booking,
    BookingLine, DeliveryOption,
};

/// Booking service
#[derive(Clone)]
pub struct BookingService {
    db: PgPool,
}

/// Database row for a booking header
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    organization_id: Uuid,
    bargain_no: String,
    bargain_date: NaiveDate,
    buyer_id: Uuid,
    warehouse_id: Uuid,
    delivery_option: String,
    delivery_address_line: Option<String>,
    delivery_city: Option<String>,
    delivery_state: Option<String>,
    delivery_pincode: Option<String>,
    validity_days: i32,
    bill_type: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self, lines: Vec<BookingLine>) -> AppResult<Booking> {
        let delivery_option = DeliveryOption::parse(&self.delivery_option).ok_or_else(|| {
            AppError::Service(format!("unknown delivery option '{}'", self.delivery_option))
        })?;
        let bill_type = BillType::parse(&self.bill_type)
            .ok_or_else(|| AppError::Service(format!("unknown bill type '{}'", self.bill_type)))?;
        let status = BargainStatus::parse(&self.status)
            .ok_or_else(|| AppError::Service(format!("unknown status '{}'", self.status)))?;

        let delivery_address = match (
            self.delivery_address_line,
            self.delivery_city,
            self.delivery_state,
            self.delivery_pincode,
        ) {
            (Some(line), Some(city), Some(state), Some(pincode)) => Some(Address {
                line,
                city,
                state,
                pincode,
            }),
            _ => None,
        };

        Ok(Booking {
            id: self.id,
            organization_id: self.organization_id,
            bargain_no: self.bargain_no,
            bargain_date: self.bargain_date,
            buyer_id: self.buyer_id,
            warehouse_id: self.warehouse_id,
            delivery_option,
            delivery_address,
            validity_days: self.validity_days,
            bill_type,
            status,
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for a booking line
#[derive(Debug, sqlx::FromRow)]
struct BookingLineRow {
    id: Uuid,
    booking_id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
    virtual_quantity: Decimal,
    billed_quantity: Decimal,
}

impl From<BookingLineRow> for BookingLine {
    fn from(row: BookingLineRow) -> Self {
        BookingLine {
            id: row.id,
            booking_id: row.booking_id,
            item_id: row.item_id,
            quantity: row.quantity,
            virtual_quantity: row.virtual_quantity,
            billed_quantity: row.billed_quantity,
        }
    }
}

/// One item line of a new booking
#[derive(Debug, Deserialize)]
pub struct BookingLineInput {
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// Input for creating a booking
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingInput {
    #[validate(length(min = 1, message = "Bargain number is required"))]
    pub bargain_no: String,
    pub bargain_date: NaiveDate,
    pub buyer_id: Uuid,
    pub warehouse_id: Uuid,
    pub delivery_option: DeliveryOption,
    pub delivery_address: Option<Address>,
    #[validate(range(min = 1, message = "Validity must be at least one day"))]
    pub validity_days: i32,
    pub bill_type: BillType,
    pub lines: Vec<BookingLineInput>,
}

impl BookingService {
    /// Create a new BookingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a booking with its item lines
    pub async fn create(
        &self,
        organization_id: Uuid,
        input: CreateBookingInput,
    ) -> AppResult<Booking> {
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

        let address = match input.delivery_option {
            DeliveryOption::Delivery => {
                let address = input.delivery_address.as_ref().ok_or_else(|| {
                    AppError::validation(
                        "delivery_address",
                        "Delivery address is required for the delivery option",
                    )
                })?;
                if address.line.trim().is_empty()
                    || address.city.trim().is_empty()
                    || address.state.trim().is_empty()
                {
                    return Err(AppError::validation(
                        "delivery_address",
                        "Delivery address must include line, city and state",
                    ));
                }
                validate_pincode(&address.pincode)
                    .map_err(|msg| AppError::validation("delivery_address.pincode", msg))?;
                Some(address)
            }
            DeliveryOption::Pickup => None,
        };

        self.ensure_exists("buyers", "Buyer", organization_id, input.buyer_id)
            .await?;
        self.ensure_exists("warehouses", "Warehouse", organization_id, input.warehouse_id)
            .await?;
        for line in &input.lines {
            self.ensure_exists("items", "Item", organization_id, line.item_id)
                .await?;
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE organization_id = $1 AND bargain_no = $2)",
        )
        .bind(organization_id)
        .bind(&input.bargain_no)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::Conflict {
                resource: "booking".to_string(),
                message: format!("Bargain number '{}' is already in use", input.bargain_no),
            });
        }

        let mut tx = self.db.begin().await?;

        let header = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (organization_id, bargain_no, bargain_date, buyer_id,
                                  warehouse_id, delivery_option, delivery_address_line,
                                  delivery_city, delivery_state, delivery_pincode,
                                  validity_days, bill_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, organization_id, bargain_no, bargain_date, buyer_id,
                      warehouse_id, delivery_option, delivery_address_line,
                      delivery_city, delivery_state, delivery_pincode,
                      validity_days, bill_type, status, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&input.bargain_no)
        .bind(input.bargain_date)
        .bind(input.buyer_id)
        .bind(input.warehouse_id)
        .bind(input.delivery_option.as_str())
        .bind(address.map(|a| a.line.clone()))
        .bind(address.map(|a| a.city.clone()))
        .bind(address.map(|a| a.state.clone()))
        .bind(address.map(|a| a.pincode.clone()))
        .bind(input.validity_days)
        .bind(input.bill_type.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let row = sqlx::query_as::<_, BookingLineRow>(
                r#"
                INSERT INTO booking_lines (booking_id, item_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, booking_id, item_id, quantity, virtual_quantity, billed_quantity
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

        header.into_booking(lines)
    }

    /// List bookings for an organization, newest bargain first
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, organization_id, bargain_no, bargain_date, buyer_id,
                   warehouse_id, delivery_option, delivery_address_line,
                   delivery_city, delivery_state, delivery_pincode,
                   validity_days, bill_type, status, created_at, updated_at
            FROM bookings
            WHERE organization_id = $1
            ORDER BY bargain_date DESC, created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.load_lines(row.id).await?;
            bookings.push(row.into_booking(lines)?);
        }
        Ok(bookings)
    }

    /// Get a booking with its lines
    pub async fn get(&self, organization_id: Uuid, booking_id: Uuid) -> AppResult<Booking> {
        let row = self.load_header(organization_id, booking_id).await?;
        let lines = self.load_lines(booking_id).await?;
        row.into_booking(lines)
    }

    /// Delete a booking; rejected once any sale references it
    pub async fn delete(&self, organization_id: Uuid, booking_id: Uuid) -> AppResult<()> {
        self.load_header(organization_id, booking_id).await?;

        let references =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales WHERE booking_id = $1")
                .bind(booking_id)
                .fetch_one(&self.db)
                .await?;

        if references > 0 {
            return Err(AppError::ReferencedEntity {
                resource: "Booking".to_string(),
                references,
            });
        }

        sqlx::query("DELETE FROM bookings WHERE id = $1 AND organization_id = $2")
            .bind(booking_id)
            .bind(organization_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn load_header(&self, organization_id: Uuid, booking_id: Uuid) -> AppResult<BookingRow> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, organization_id, bargain_no, bargain_date, buyer_id,
                   warehouse_id, delivery_option, delivery_address_line,
                   delivery_city, delivery_state, delivery_pincode,
                   validity_days, bill_type, status, created_at, updated_at
            FROM bookings
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(booking_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))
    }

    async fn load_lines(&self, booking_id: Uuid) -> AppResult<Vec<BookingLine>> {
        let rows = sqlx::query_as::<_, BookingLineRow>(
            r#"
            SELECT id, booking_id, item_id, quantity, virtual_quantity, billed_quantity
            FROM booking_lines
            WHERE booking_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(booking_id)
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
