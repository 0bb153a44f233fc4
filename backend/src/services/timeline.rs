//! Timeline query over the inventory movement log
//!
//! Read-only: filters movements by item, bucket, destination kind and a
//! date window, then groups them by route for the frontend timeline view.

use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    group_movements, DateRange, DestinationType, InventoryMovement, InventoryType, MovementGroup,
    RangePreset, SourceType,
};

/// Timeline service
#[derive(Clone)]
pub struct TimelineService {
    db: PgPool,
}

/// Database row for a movement
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: Uuid,
    organization_id: Uuid,
    item_id: Uuid,
    quantity: rust_decimal::Decimal,
    inventory_type: String,
    source_type: String,
    source_id: Uuid,
    destination_type: String,
    destination_id: Uuid,
    recorded_at: chrono::DateTime<chrono::Utc>,
}

impl MovementRow {
    fn into_movement(self) -> AppResult<InventoryMovement> {
        let inventory_type = InventoryType::parse(&self.inventory_type).ok_or_else(|| {
            AppError::Service(format!("unknown inventory type '{}'", self.inventory_type))
        })?;
        let source_type = SourceType::parse(&self.source_type)
            .ok_or_else(|| AppError::Service(format!("unknown source type '{}'", self.source_type)))?;
        let destination_type = DestinationType::parse(&self.destination_type).ok_or_else(|| {
            AppError::Service(format!("unknown destination type '{}'", self.destination_type))
        })?;
        Ok(InventoryMovement {
            id: self.id,
            organization_id: self.organization_id,
            item_id: self.item_id,
            quantity: self.quantity,
            inventory_type,
            source_type,
            source_id: self.source_id,
            destination_type,
            destination_id: self.destination_id,
            recorded_at: self.recorded_at,
        })
    }
}

/// Timeline query parameters
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub range: Option<RangePreset>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    /// `true` keeps only movements held for pickup (booking destinations),
    /// `false` only delivered ones (buyer destinations)
    pub pickup: Option<bool>,
}

impl TimelineQuery {
    /// Resolve the query's date filter, if any.
    ///
    /// A preset other than `custom` wins; `custom` (or no preset) uses the
    /// explicit `from`/`to` bounds and requires both.
    fn resolve_window(&self) -> AppResult<Option<DateRange>> {
        match self.range {
            Some(RangePreset::Custom) | None => match (self.from, self.to) {
                (Some(from), Some(to)) => {
                    if from > to {
                        return Err(AppError::validation(
                            "range",
                            "Range start must not be after its end",
                        ));
                    }
                    Ok(Some(DateRange { start: from, end: to }))
                }
                (None, None) if self.range.is_none() => Ok(None),
                _ => Err(AppError::validation(
                    "range",
                    "A custom range requires both 'from' and 'to'",
                )),
            },
            Some(preset) => Ok(preset.window(Utc::now().date_naive())),
        }
    }
}

impl TimelineService {
    /// Create a new TimelineService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Movement history for one item and stock bucket, grouped by route
    pub async fn item_timeline(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
        inventory_type: InventoryType,
        query: TimelineQuery,
    ) -> AppResult<Vec<MovementGroup>> {
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

        let window = query.resolve_window()?;
        let (start, end) = match window {
            Some(range) => {
                let start = range.start.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
                // End bound is exclusive at the next midnight so the whole
                // end day is included.
                let end = range
                    .end
                    .succ_opt()
                    .and_then(|next| next.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc());
                (start, end)
            }
            None => (None, None),
        };

        let destination_filter = query.pickup.map(|pickup| {
            if pickup {
                DestinationType::Booking.as_str()
            } else {
                DestinationType::Buyer.as_str()
            }
        });

        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, organization_id, item_id, quantity, inventory_type,
                   source_type, source_id, destination_type, destination_id, recorded_at
            FROM inventory_movements
            WHERE organization_id = $1
              AND item_id = $2
              AND inventory_type = $3
              AND ($4::TIMESTAMPTZ IS NULL OR recorded_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR recorded_at < $5)
              AND ($6::TEXT IS NULL OR destination_type = $6)
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(item_id)
        .bind(inventory_type.as_str())
        .bind(start)
        .bind(end)
        .bind(destination_filter)
        .fetch_all(&self.db)
        .await?;

        let movements = rows
            .into_iter()
            .map(MovementRow::into_movement)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(group_movements(movements))
    }
}
