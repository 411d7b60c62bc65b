// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::common::error::ApiError;
use crate::models::auth::CurrentUser;

// O tenant (organização) da requisição, resolvido a partir da sessão do
// provedor de identidade pelo auth_guard. As rotas de leitura usam este
// extrator diretamente: sem organização na sessão, a requisição é
// rejeitada com 401 antes de qualquer lógica de negócio.
#[derive(Debug, Clone)]
pub struct TenantContext(pub String);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    // ApiError já implementa IntoResponse, então serve de rejeição.
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<CurrentUser>().ok_or(ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid or missing authentication token".to_string(),
        })?;

        match &user.org_id {
            Some(org_id) => Ok(TenantContext(org_id.clone())),
            None => Err(ApiError {
                status: StatusCode::UNAUTHORIZED,
                message: "You must be in an organization to perform this action".to_string(),
            }),
        }
    }
}
