//! Organization service
//!
//! Organizations mirror the external identity provider; `register` upserts
//! from the provider's webhook and `check` answers whether an external id
//! is already registered.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{validate_email, Organization};

/// Organization service
#[derive(Clone)]
pub struct OrganizationService {
    db: PgPool,
}

/// Database row for an organization
#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    external_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: row.id,
            external_id: row.external_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for registering an organization from the identity provider
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterOrganizationInput {
    #[validate(length(min = 1, message = "External id is required"))]
    pub external_id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Input for updating an organization
#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Response for the registration check
#[derive(Debug, Serialize)]
pub struct OrganizationCheck {
    pub registered: bool,
    pub organization: Option<Organization>,
}

impl OrganizationService {
    /// Create a new OrganizationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register an organization, upserting on the provider's external id
    pub async fn register(&self, input: RegisterOrganizationInput) -> AppResult<Organization> {
        input.validate()?;
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::validation("email", msg))?;
        }

        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (external_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (external_id)
            DO UPDATE SET name = EXCLUDED.name,
                          email = COALESCE(EXCLUDED.email, organizations.email),
                          phone = COALESCE(EXCLUDED.phone, organizations.phone),
                          updated_at = now()
            RETURNING id, external_id, name, email, phone, created_at, updated_at
            "#,
        )
        .bind(&input.external_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Create an organization; fails if the external id is already registered
    pub async fn create(&self, input: RegisterOrganizationInput) -> AppResult<Organization> {
        input.validate()?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE external_id = $1)",
        )
        .bind(&input.external_id)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::Conflict {
                resource: "organization".to_string(),
                message: "An organization with this external id already exists".to_string(),
            });
        }

        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (external_id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_id, name, email, phone, created_at, updated_at
            "#,
        )
        .bind(&input.external_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Check whether an external id is registered
    pub async fn check(&self, external_id: &str) -> AppResult<OrganizationCheck> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, external_id, name, email, phone, created_at, updated_at
             FROM organizations WHERE external_id = $1",
        )
        .bind(external_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(OrganizationCheck {
            registered: row.is_some(),
            organization: row.map(Into::into),
        })
    }

    /// Get an organization by id
    pub async fn get(&self, organization_id: Uuid) -> AppResult<Organization> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, external_id, name, email, phone, created_at, updated_at
             FROM organizations WHERE id = $1",
        )
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization".to_string()))?;

        Ok(row.into())
    }

    /// Update an organization's contact details
    pub async fn update(
        &self,
        organization_id: Uuid,
        input: UpdateOrganizationInput,
    ) -> AppResult<Organization> {
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name", "Name cannot be empty"));
            }
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::validation("email", msg))?;
        }

        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            UPDATE organizations
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                updated_at = now()
            WHERE id = $4
            RETURNING id, external_id, name, email, phone, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(organization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization".to_string()))?;

        Ok(row.into())
    }
}
