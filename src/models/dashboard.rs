// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::task::TaskWithAssignee;

// Agregado derivado, nunca persistido: recalculado a cada consulta.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tasks_by_status: TasksByStatus,
    pub recent_tasks: Vec<TaskWithAssignee>,
    pub total_tasks: i64,
    pub project_count: i64,
    pub projects: Vec<ProjectTaskCount>,
}

// Os três buckets sempre presentes na resposta, mesmo zerados.
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TasksByStatus {
    #[serde(rename = "PLANNED")]
    pub planned: i64,
    #[serde(rename = "IN_PROGRESS")]
    pub in_progress: i64,
    #[serde(rename = "DONE")]
    pub done: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTaskCount {
    pub id: Uuid,
    pub name: String,
    pub task_count: i64,
}
