// src/models/auth.rs

use serde::{Deserialize, Serialize};

use crate::common::error::AppError;
use crate::models::user::UserSnapshot;

// Estrutura de dados ("claims") dentro do JWT emitido pelo provedor de
// identidade externo. A organização ativa e o plano vêm prontos na sessão;
// este backend só os consome, nunca os administra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // ID do usuário no provedor
    pub org_id: Option<String>,   // Organização ativa da sessão (tenant)
    pub plan: Option<String>,     // "free" | "pro"
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

// Identidade resolvida na borda da requisição, disponível aos handlers
// via o extrator AuthenticatedUser.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub org_id: Option<String>,
    pub plan: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl CurrentUser {
    // Oráculo de entitlement delegado ao provedor: o plano já veio na sessão.
    pub fn has_plan(&self, plan: &str) -> bool {
        self.plan.as_deref() == Some(plan)
    }

    // Tenant explícito para as operações de núcleo. Sem organização na
    // sessão, nenhuma operação escopada pode prosseguir.
    pub fn require_org(&self) -> Result<&str, AppError> {
        self.org_id.as_deref().ok_or(AppError::Unauthorized)
    }

    // Snapshot de exibição para o upsert oportunista na criação de tarefas.
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            org_id: claims.org_id,
            plan: claims.plan,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            image_url: claims.image_url,
        }
    }
}
