// src/handlers/tasks.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ActionResult, ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::{auth::CurrentUser, task::TaskStatus, task::TaskWithAssignee},
};

// =============================================================================
//  LEITURA (consumida pelo poller do cliente)
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    // Sem projectId, devolve todas as tarefas do tenant.
    pub project_id: Option<Uuid>,
}

// GET /api/tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Tarefas do tenant, por \"order\" crescente", body = Vec<TaskWithAssignee>),
        (status = 401, description = "Sem organização na sessão"),
        (status = 500, description = "Falha do armazenamento (mensagem genérica)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tasks(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ListTasksQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = match query.project_id {
        Some(project_id) => {
            app_state
                .task_service
                .get_tasks(&tenant.0, Some(project_id))
                .await
        }
        None => app_state.task_service.get_all_tasks(&tenant.0).await,
    }
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tasks)))
}

// =============================================================================
//  MUTAÇÕES (envelope {success, data|error}; nunca status HTTP de erro)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Write the release notes")]
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<Uuid>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
}

fn default_status() -> TaskStatus {
    TaskStatus::Planned
}

// A mutação devolve só o mínimo que o chamador precisa: o id novo.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedTask {
    pub id: Uuid,
}

// POST /api/tasks
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskPayload,
    responses(
        (status = 200, description = "Envelope {success, data: {id}} ou {success: false, error}")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTaskPayload>,
) -> Json<ActionResult<CreatedTask>> {
    let result = try_create_task(&app_state, &user.0, payload).await;
    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}

async fn try_create_task(
    app_state: &AppState,
    user: &CurrentUser,
    payload: CreateTaskPayload,
) -> Result<CreatedTask, AppError> {
    payload.validate()?;
    let org_id = user.require_org()?;

    let snapshot = user.snapshot();
    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let id = app_state
        .task_service
        .create_task(
            org_id,
            Some(&snapshot),
            payload.title.trim(),
            description,
            payload.project_id,
            payload.status,
        )
        .await?;

    Ok(CreatedTask { id })
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatusPayload {
    pub status: TaskStatus,
}

// PATCH /api/tasks/{id}/status
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/status",
    tag = "Tasks",
    request_body = UpdateTaskStatusPayload,
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses(
        (status = 200, description = "Envelope {success} (a tarefa vai para o fim da coluna de destino)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_task_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskStatusPayload>,
) -> Json<ActionResult<()>> {
    let result = async {
        let org_id = user.0.require_org()?;
        app_state
            .task_service
            .update_task_status(org_id, task_id, payload.status)
            .await
    }
    .await;

    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTasksPayload {
    // A coluna inteira, na ordem desejada.
    pub task_ids: Vec<Uuid>,
    pub status: TaskStatus,
}

// POST /api/tasks/reorder
#[utoipa::path(
    post,
    path = "/api/tasks/reorder",
    tag = "Tasks",
    request_body = ReorderTasksPayload,
    responses(
        (status = 200, description = "Envelope {success}; \"order\" = índice na lista enviada")
    ),
    security(("api_jwt" = []))
)]
pub async fn reorder_tasks(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<ReorderTasksPayload>,
) -> Json<ActionResult<()>> {
    let result = async {
        let org_id = user.0.require_org()?;
        app_state
            .task_service
            .reorder_tasks(org_id, &payload.task_ids, payload.status)
            .await
    }
    .await;

    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    // Atualização parcial: só os campos enviados mudam.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    pub description: Option<String>,
}

// PATCH /api/tasks/{id}
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    request_body = UpdateTaskPayload,
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses((status = 200, description = "Envelope {success}")),
    security(("api_jwt" = []))
)]
pub async fn update_task(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Json<ActionResult<()>> {
    let result = async {
        payload.validate()?;
        let org_id = user.0.require_org()?;
        app_state
            .task_service
            .update_task(
                org_id,
                task_id,
                payload.title.as_deref(),
                payload.description.as_deref(),
            )
            .await
    }
    .await;

    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}

// DELETE /api/tasks/{id}
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses((status = 200, description = "Envelope {success}")),
    security(("api_jwt" = []))
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
) -> Json<ActionResult<()>> {
    let result = async {
        let org_id = user.0.require_org()?;
        app_state.task_service.delete_task(org_id, task_id).await
    }
    .await;

    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}
