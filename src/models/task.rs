// src/models/task.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::user::UserSnapshot;

// A coluna do quadro em que a tarefa está. Conjunto fechado:
// o quadro só conhece estas três colunas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[sqlx(rename = "PLANNED")]
    #[serde(rename = "PLANNED")]
    Planned,
    #[sqlx(rename = "IN_PROGRESS")]
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[sqlx(rename = "DONE")]
    #[serde(rename = "DONE")]
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub org_id: String,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    // Inteiro monotônico por escopo (projeto, status). O único contrato é
    // que "order" crescente dentro do escopo dá a sequência de exibição;
    // colisões entre escritores concorrentes são aceitas (ver common::ordering).
    pub order: i32,
    pub assignee_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Tarefa enriquecida com o snapshot do responsável, como o cliente consome.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithAssignee {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<UserSnapshot>,
}
