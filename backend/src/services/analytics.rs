//! Dashboard summary aggregation
//!
//! Pure read queries; nothing here mutates state.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// Bargain counts per status
#[derive(Debug, Default, Serialize)]
pub struct StatusCounts {
    pub created: i64,
    pub partial: i64,
    pub complete: i64,
}

impl StatusCounts {
    fn apply(&mut self, status: &str, count: i64) {
        match status {
            "created" => self.created = count,
            "partial" => self.partial = count,
            "complete" => self.complete = count,
            _ => {}
        }
    }
}

/// Movement totals per stock bucket
#[derive(Debug, Default, Serialize)]
pub struct MovementTotals {
    pub r#virtual: Decimal,
    pub billed: Decimal,
}

/// Dashboard summary payload
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub orders: StatusCounts,
    pub bookings: StatusCounts,
    /// Ordered-but-unfulfilled quantity across open orders
    pub open_order_quantity: Decimal,
    /// Booked-but-unsold quantity across open bookings
    pub open_booking_quantity: Decimal,
    /// Movement totals over the last 30 days
    pub movements_last_30_days: MovementTotals,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the dashboard summary for an organization
    pub async fn summary(&self, organization_id: Uuid) -> AppResult<AnalyticsSummary> {
        let mut orders = StatusCounts::default();
        for (status, count) in sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM orders WHERE organization_id = $1 GROUP BY status",
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?
        {
            orders.apply(&status, count);
        }

        let mut bookings = StatusCounts::default();
        for (status, count) in sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM bookings WHERE organization_id = $1 GROUP BY status",
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?
        {
            bookings.apply(&status, count);
        }

        let open_order_quantity = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(ol.ordered_quantity - ol.fulfilled_quantity)
            FROM order_lines ol
            JOIN orders o ON o.id = ol.order_id
            WHERE o.organization_id = $1 AND o.status <> 'complete'
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        let open_booking_quantity = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(bl.quantity - bl.virtual_quantity - bl.billed_quantity)
            FROM booking_lines bl
            JOIN bookings b ON b.id = bl.booking_id
            WHERE b.organization_id = $1 AND b.status <> 'complete'
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        let mut movements = MovementTotals::default();
        for (inventory_type, total) in sqlx::query_as::<_, (String, Decimal)>(
            r#"
            SELECT inventory_type, SUM(quantity)
            FROM inventory_movements
            WHERE organization_id = $1 AND recorded_at >= now() - INTERVAL '30 days'
            GROUP BY inventory_type
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?
        {
            match inventory_type.as_str() {
                "virtual" => movements.r#virtual = total,
                "billed" => movements.billed = total,
                _ => {}
            }
        }

        Ok(AnalyticsSummary {
            orders,
            bookings,
            open_order_quantity,
            open_booking_quantity,
            movements_last_30_days: movements,
        })
    }
}
