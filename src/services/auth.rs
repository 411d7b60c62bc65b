// src/services/auth.rs

use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{
    common::error::AppError,
    models::auth::{Claims, CurrentUser},
};

// Validação dos tokens do provedor de identidade externo. As claims já
// carregam a organização ativa e o plano da sessão, então nenhuma consulta
// ao banco é necessária aqui.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<CurrentUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token_with_org(org_id: Option<&str>, plan: Option<&str>) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: "user_123".to_string(),
            org_id: org_id.map(String::from),
            plan: plan.map(String::from),
            email: Some("ana@example.com".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: Some("Silva".to_string()),
            image_url: None,
            exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn resolves_identity_from_valid_token() {
        let service = AuthService::new(SECRET.to_string());
        let user = service
            .validate_token(&token_with_org(Some("org_abc"), Some("pro")))
            .unwrap();
        assert_eq!(user.id, "user_123");
        assert_eq!(user.require_org().unwrap(), "org_abc");
        assert!(user.has_plan("pro"));
    }

    #[test]
    fn rejects_token_signed_with_another_secret() {
        let service = AuthService::new("other-secret".to_string());
        let result = service.validate_token(&token_with_org(Some("org_abc"), None));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn session_without_org_has_no_tenant() {
        let service = AuthService::new(SECRET.to_string());
        let user = service
            .validate_token(&token_with_org(None, Some("free")))
            .unwrap();
        assert!(matches!(user.require_org(), Err(AppError::Unauthorized)));
        assert!(!user.has_plan("pro"));
    }
}
