//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use taskboard_backend::config::AppState;
use taskboard_backend::docs::ApiDoc;
use taskboard_backend::handlers;
use taskboard_backend::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let task_routes = Router::new()
        .route(
            "/",
            get(handlers::tasks::get_tasks).post(handlers::tasks::create_task),
        )
        .route("/reorder", post(handlers::tasks::reorder_tasks))
        .route(
            "/{id}",
            delete(handlers::tasks::delete_task).patch(handlers::tasks::update_task),
        )
        .route("/{id}/status", patch(handlers::tasks::update_task_status));

    let project_routes = Router::new()
        .route(
            "/",
            get(handlers::projects::get_projects).post(handlers::projects::create_project),
        )
        .route(
            "/{id}",
            patch(handlers::projects::rename_project)
                .delete(handlers::projects::delete_project),
        );

    let api_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/projects", project_routes)
        .route("/board", get(handlers::board::get_board))
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        // Toda a API é protegida: o guard resolve o usuário e o tenant.
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
