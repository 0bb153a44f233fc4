//! Transport master-data service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_indian_phone, Transport};

/// Transport service
#[derive(Clone)]
pub struct TransportService {
    db: PgPool,
}

/// Database row for a transport
#[derive(Debug, sqlx::FromRow)]
struct TransportRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    transport_type: String,
    agency: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TransportRow> for Transport {
    fn from(row: TransportRow) -> Self {
        Transport {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            transport_type: row.transport_type,
            agency: row.agency,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a transport
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransportInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Transport type is required"))]
    pub transport_type: String,
    #[validate(length(min = 1, message = "Agency is required"))]
    pub agency: String,
    pub phone: String,
}

/// Input for updating a transport
#[derive(Debug, Deserialize)]
pub struct UpdateTransportInput {
    pub name: Option<String>,
    pub transport_type: Option<String>,
    pub agency: Option<String>,
    pub phone: Option<String>,
}

impl TransportService {
    /// Create a new TransportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a transport
    pub async fn create(
        &self,
        organization_id: Uuid,
        input: CreateTransportInput,
    ) -> AppResult<Transport> {
        input.validate()?;
        validate_indian_phone(&input.phone).map_err(|msg| AppError::validation("phone", msg))?;

        let row = sqlx::query_as::<_, TransportRow>(
            r#"
            INSERT INTO transports (organization_id, name, transport_type, agency, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, name, transport_type, agency, phone,
                      created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(&input.name)
        .bind(&input.transport_type)
        .bind(&input.agency)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List transports for an organization
    pub async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Transport>> {
        let rows = sqlx::query_as::<_, TransportRow>(
            r#"
            SELECT id, organization_id, name, transport_type, agency, phone,
                   created_at, updated_at
            FROM transports
            WHERE organization_id = $1
            ORDER BY name
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a transport by id
    pub async fn get(&self, organization_id: Uuid, transport_id: Uuid) -> AppResult<Transport> {
        let row = sqlx::query_as::<_, TransportRow>(
            r#"
            SELECT id, organization_id, name, transport_type, agency, phone,
                   created_at, updated_at
            FROM transports
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(transport_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transport".to_string()))?;

        Ok(row.into())
    }

    /// Update a transport
    pub async fn update(
        &self,
        organization_id: Uuid,
        transport_id: Uuid,
        input: UpdateTransportInput,
    ) -> AppResult<Transport> {
        if let Some(phone) = &input.phone {
            validate_indian_phone(phone).map_err(|msg| AppError::validation("phone", msg))?;
        }

        let row = sqlx::query_as::<_, TransportRow>(
            r#"
            UPDATE transports
            SET name = COALESCE($1, name),
                transport_type = COALESCE($2, transport_type),
                agency = COALESCE($3, agency),
                phone = COALESCE($4, phone),
                updated_at = now()
            WHERE id = $5 AND organization_id = $6
            RETURNING id, organization_id, name, transport_type, agency, phone,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.transport_type)
        .bind(&input.agency)
        .bind(&input.phone)
        .bind(transport_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transport".to_string()))?;

        Ok(row.into())
    }

    /// Delete a transport; rejected while any purchase or sale references it
    pub async fn delete(&self, organization_id: Uuid, transport_id: Uuid) -> AppResult<()> {
        self.get(organization_id, transport_id).await?;

        let references = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM purchases WHERE transport_id = $1)
                 + (SELECT COUNT(*) FROM sales WHERE transport_id = $1)
            "#,
        )
        .bind(transport_id)
        .fetch_one(&self.db)
        .await?;

        if references > 0 {
            return Err(AppError::ReferencedEntity {
                resource: "Transport".to_string(),
                references,
            });
        }

        sqlx::query("DELETE FROM transports WHERE id = $1 AND organization_id = $2")
            .bind(transport_id)
            .bind(organization_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
