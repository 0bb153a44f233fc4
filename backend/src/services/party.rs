//! Party master-data service for buyers and manufacturers
//!
//! Both party kinds share one record shape and one service; the kind picks
//! the table and the reference guard used on delete.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{
    validate_email, validate_gstin, validate_indian_phone, validate_pincode, Address, Party,
    PartyKind,
};

/// Party service covering buyers and manufacturers
#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
}

/// Database row for a party
#[derive(Debug, sqlx::FromRow)]
struct PartyRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    company: String,
    address_line: String,
    city: String,
    state: String,
    pincode: String,
    gst_number: String,
    phone: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PartyRow> for Party {
    fn from(row: PartyRow) -> Self {
        Party {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            company: row.company,
            address: Address {
                line: row.address_line,
                city: row.city,
                state: row.state,
                pincode: row.pincode,
            },
            gst_number: row.gst_number,
            phone: row.phone,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a party
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartyInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Address line is required"))]
    pub address_line: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    pub pincode: String,
    pub gst_number: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Input for updating a party
#[derive(Debug, Deserialize)]
pub struct UpdatePartyInput {
    pub name: Option<String>,
    pub company: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

fn table(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Buyer => "buyers",
        PartyKind::Manufacturer => "manufacturers",
    }
}

impl PartyService {
    /// Create a new PartyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a party record
    pub async fn create(
        &self,
        organization_id: Uuid,
        kind: PartyKind,
        input: CreatePartyInput,
    ) -> AppResult<Party> {
        input.validate()?;
        validate_pincode(&input.pincode).map_err(|msg| AppError::validation("pincode", msg))?;
        validate_gstin(&input.gst_number)
            .map_err(|msg| AppError::validation("gst_number", msg))?;
        validate_indian_phone(&input.phone).map_err(|msg| AppError::validation("phone", msg))?;
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::validation("email", msg))?;
        }

        let row = sqlx::query_as::<_, PartyRow>(&format!(
            r#"
            INSERT INTO {} (organization_id, name, company, address_line, city, state,
                            pincode, gst_number, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, organization_id, name, company, address_line, city, state,
                      pincode, gst_number, phone, email, created_at, updated_at
            "#,
            table(kind)
        ))
        .bind(organization_id)
        .bind(&input.name)
        .bind(&input.company)
        .bind(&input.address_line)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.pincode)
        .bind(&input.gst_number)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List parties for an organization
    pub async fn list(&self, organization_id: Uuid, kind: PartyKind) -> AppResult<Vec<Party>> {
        let rows = sqlx::query_as::<_, PartyRow>(&format!(
            r#"
            SELECT id, organization_id, name, company, address_line, city, state,
                   pincode, gst_number, phone, email, created_at, updated_at
            FROM {}
            WHERE organization_id = $1
            ORDER BY name
            "#,
            table(kind)
        ))
        .bind(organization_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a party by id
    pub async fn get(
        &self,
        organization_id: Uuid,
        kind: PartyKind,
        party_id: Uuid,
    ) -> AppResult<Party> {
        let row = sqlx::query_as::<_, PartyRow>(&format!(
            r#"
            SELECT id, organization_id, name, company, address_line, city, state,
                   pincode, gst_number, phone, email, created_at, updated_at
            FROM {}
            WHERE id = $1 AND organization_id = $2
            "#,
            table(kind)
        ))
        .bind(party_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(resource_name(kind).to_string()))?;

        Ok(row.into())
    }

    /// Update a party record
    pub async fn update(
        &self,
        organization_id: Uuid,
        kind: PartyKind,
        party_id: Uuid,
        input: UpdatePartyInput,
    ) -> AppResult<Party> {
        if let Some(pincode) = &input.pincode {
            validate_pincode(pincode).map_err(|msg| AppError::validation("pincode", msg))?;
        }
        if let Some(gst_number) = &input.gst_number {
            validate_gstin(gst_number).map_err(|msg| AppError::validation("gst_number", msg))?;
        }
        if let Some(phone) = &input.phone {
            validate_indian_phone(phone).map_err(|msg| AppError::validation("phone", msg))?;
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::validation("email", msg))?;
        }

        let row = sqlx::query_as::<_, PartyRow>(&format!(
            r#"
            UPDATE {}
            SET name = COALESCE($1, name),
                company = COALESCE($2, company),
                address_line = COALESCE($3, address_line),
                city = COALESCE($4, city),
                state = COALESCE($5, state),
                pincode = COALESCE($6, pincode),
                gst_number = COALESCE($7, gst_number),
                phone = COALESCE($8, phone),
                email = COALESCE($9, email),
                updated_at = now()
            WHERE id = $10 AND organization_id = $11
            RETURNING id, organization_id, name, company, address_line, city, state,
                      pincode, gst_number, phone, email, created_at, updated_at
            "#,
            table(kind)
        ))
        .bind(&input.name)
        .bind(&input.company)
        .bind(&input.address_line)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.pincode)
        .bind(&input.gst_number)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(party_id)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(resource_name(kind).to_string()))?;

        Ok(row.into())
    }

    /// Delete a party; rejected while any bargain references it
    pub async fn delete(
        &self,
        organization_id: Uuid,
        kind: PartyKind,
        party_id: Uuid,
    ) -> AppResult<()> {
        self.get(organization_id, kind, party_id).await?;

        let references = match kind {
            PartyKind::Buyer => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE buyer_id = $1")
                    .bind(party_id)
                    .fetch_one(&self.db)
                    .await?
            }
            PartyKind::Manufacturer => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM orders WHERE manufacturer_id = $1",
                )
                .bind(party_id)
                .fetch_one(&self.db)
                .await?
            }
        };

        if references > 0 {
            return Err(AppError::ReferencedEntity {
                resource: resource_name(kind).to_string(),
                references,
            });
        }

        sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1 AND organization_id = $2",
            table(kind)
        ))
        .bind(party_id)
        .bind(organization_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

fn resource_name(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Buyer => "Buyer",
        PartyKind::Manufacturer => "Manufacturer",
    }
}
