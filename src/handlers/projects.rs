// src/handlers/projects.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ActionResult, ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::project::Project,
};

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projetos do tenant, do mais antigo ao mais novo", body = Vec<Project>),
        (status = 401, description = "Sem organização na sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .project_service
        .get_projects(&tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projects)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    #[schema(example = "Q3 Launch")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedProject {
    pub id: Uuid,
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 200, description = "Envelope {success, data: {id}}; sem plano \"pro\" o segundo projeto falha")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProjectPayload>,
) -> Json<ActionResult<CreatedProject>> {
    let result = async {
        payload.validate()?;
        let org_id = user.0.require_org()?;
        let has_pro = user.0.has_plan("pro");
        let id = app_state
            .project_service
            .create_project(org_id, has_pro, &payload.name)
            .await?;
        Ok::<_, AppError>(CreatedProject { id })
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
pub struct RenameProjectPayload {
    pub name: String,
}

// PATCH /api/projects/{id}
#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    tag = "Projects",
    request_body = RenameProjectPayload,
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses((status = 200, description = "Envelope {success}")),
    security(("api_jwt" = []))
)]
pub async fn rename_project(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<RenameProjectPayload>,
) -> Json<ActionResult<()>> {
    let result = async {
        let org_id = user.0.require_org()?;
        app_state
            .project_service
            .rename_project(org_id, project_id, &payload.name)
            .await
    }
    .await;

    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}

// DELETE /api/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Envelope {success}; o último projeto do tenant não pode ser excluído")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Json<ActionResult<()>> {
    let result = async {
        let org_id = user.0.require_org()?;
        app_state
            .project_service
            .delete_project(org_id, project_id)
            .await
    }
    .await;

    Json(ActionResult::from_result(
        result,
        &locale,
        &app_state.i18n_store,
    ))
}
