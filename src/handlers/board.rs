// src/handlers/board.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::{project::Project, task::TaskWithAssignee},
};

// Tudo que o quadro precisa para a primeira pintura, em uma única resposta.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub projects: Vec<Project>,
    pub tasks: Vec<TaskWithAssignee>,
    pub default_project_id: Uuid,
    pub has_pro: bool,
}

// GET /api/board
//
// Bootstrap do quadro: garante o projeto inicial do tenant (criando
// "My Project" quando não existe nenhum) e devolve projetos + tarefas.
#[utoipa::path(
    get,
    path = "/api/board",
    tag = "Board",
    responses(
        (status = 200, description = "Projetos, tarefas e o projeto padrão do tenant", body = BoardResponse),
        (status = 401, description = "Sem organização na sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let (projects, tasks, default_project_id) = app_state
        .task_service
        .get_board(&tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(BoardResponse {
            projects,
            tasks,
            default_project_id,
            has_pro: user.0.has_plan("pro"),
        }),
    ))
}
