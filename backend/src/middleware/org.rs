//! Organization context middleware
//!
//! Identity and organization membership are delegated to an external
//! provider; the frontend forwards the active organization in the
//! `X-Organization-Id` header. This middleware resolves that header into an
//! explicit `OrgContext` request extension so every service call is scoped
//! to one organization.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ApiResponse, ErrorBody};

/// Header carrying the active organization id
pub const ORG_HEADER: &str = "x-organization-id";

/// Per-request organization context
#[derive(Clone, Copy, Debug)]
pub struct OrgContext {
    pub organization_id: uuid::Uuid,
}

/// Middleware that requires a valid `X-Organization-Id` header
pub async fn org_middleware(mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(ORG_HEADER)
        .and_then(|h| h.to_str().ok());

    let organization_id = match header {
        Some(value) => match uuid::Uuid::parse_str(value) {
            Ok(id) => id,
            Err(_) => return bad_request_response("X-Organization-Id is not a valid UUID"),
        },
        None => return bad_request_response("Missing X-Organization-Id header"),
    };

    request
        .extensions_mut()
        .insert(OrgContext { organization_id });

    next.run(request).await
}

/// Create a bad request response in the standard envelope
fn bad_request_response(message: &str) -> Response {
    let envelope = ApiResponse::<serde_json::Value>::err(
        message,
        ErrorBody {
            code: "MISSING_ORGANIZATION".to_string(),
            message: message.to_string(),
            field: Some("X-Organization-Id".to_string()),
        },
    );
    (StatusCode::BAD_REQUEST, Json(envelope)).into_response()
}

/// Extractor for the current organization context
/// Use this in handlers behind `org_middleware`
#[derive(Clone, Copy, Debug)]
pub struct CurrentOrg(pub OrgContext);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentOrg
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiResponse<serde_json::Value>>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OrgContext>()
            .copied()
            .map(CurrentOrg)
            .ok_or_else(|| {
                let envelope = ApiResponse::err(
                    "Organization context required",
                    ErrorBody {
                        code: "MISSING_ORGANIZATION".to_string(),
                        message: "Organization context required".to_string(),
                        field: Some("X-Organization-Id".to_string()),
                    },
                );
                (StatusCode::BAD_REQUEST, Json(envelope))
            })
    }
}
