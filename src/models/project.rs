// src/models/project.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um projeto pertence a exatamente uma organização (tenant).
// Todo tenant com projetos tem sempre pelo menos um.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub org_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
