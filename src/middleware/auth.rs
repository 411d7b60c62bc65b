// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::CurrentUser,
};

// O middleware em si: valida o token Bearer do provedor de identidade e
// insere a identidade resolvida nos "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state
                .auth_service
                .validate_token(token)
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

            request.extensions_mut().insert(user);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))
}

// Extrator para obter a identidade autenticada diretamente nos handlers.
pub struct AuthenticatedUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(ApiError {
                status: StatusCode::UNAUTHORIZED,
                message: "Invalid or missing authentication token".to_string(),
            })
    }
}
