// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Tasks ---
        handlers::tasks::get_tasks,
        handlers::tasks::create_task,
        handlers::tasks::update_task,
        handlers::tasks::update_task_status,
        handlers::tasks::reorder_tasks,
        handlers::tasks::delete_task,

        // --- Projects ---
        handlers::projects::get_projects,
        handlers::projects::create_project,
        handlers::projects::rename_project,
        handlers::projects::delete_project,

        // --- Board / Dashboard ---
        handlers::board::get_board,
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Tasks ---
            models::task::TaskStatus,
            models::task::Task,
            models::task::TaskWithAssignee,
            models::user::UserSnapshot,

            // --- Projects ---
            models::project::Project,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::TasksByStatus,
            models::dashboard::ProjectTaskCount,

            // --- Payloads ---
            handlers::tasks::CreateTaskPayload,
            handlers::tasks::UpdateTaskPayload,
            handlers::tasks::UpdateTaskStatusPayload,
            handlers::tasks::ReorderTasksPayload,
            handlers::tasks::CreatedTask,
            handlers::projects::CreateProjectPayload,
            handlers::projects::RenameProjectPayload,
            handlers::projects::CreatedProject,
            handlers::board::BoardResponse,
        )
    ),
    tags(
        (name = "Tasks", description = "Mutação e leitura de tarefas do quadro"),
        (name = "Projects", description = "Gestão de projetos do tenant"),
        (name = "Board", description = "Bootstrap do quadro Kanban"),
        (name = "Dashboard", description = "Agregados e indicadores do tenant")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
