use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::{AuthService, Claims, ROLE_PLATFORM_ADMIN, ROLE_TENANT_ADMIN};
use crate::state::AppState;

/// Tenant identity extracted from JWT
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub subject: String,
    pub role: String,
}

impl TenantContext {
    pub fn is_platform_admin(&self) -> bool {
        self.role == ROLE_PLATFORM_ADMIN
    }
}

impl From<Claims> for TenantContext {
    fn from(claims: Claims) -> Self {
        Self {
            tenant_id: claims.tid,
            subject: claims.sub,
            role: claims.role,
        }
    }
}

/// Extractor for TenantContext - can be used directly in handlers
/// Example: `async fn handler(ctx: TenantContext) -> ... { }`
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Admin auth middleware - validates JWT, checks the role claim and injects
/// TenantContext into request extensions
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract token from Authorization header
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    // Verify token and get claims
    let claims = AuthService::verify_token(token, &state.config)?;

    // Only admin roles may reach /admin routes
    if claims.role != ROLE_TENANT_ADMIN && claims.role != ROLE_PLATFORM_ADMIN {
        return Err(AppError::Forbidden);
    }

    // Insert TenantContext into request extensions
    let context = TenantContext::from(claims);
    request.extensions_mut().insert(context);

    // Continue to handler
    Ok(next.run(request).await)
}
