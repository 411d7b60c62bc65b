// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::i18n::I18nStore,
    db::{ProjectRepository, TaskRepository, UserRepository},
    services::{AuthService, DashboardService, ProjectService, TaskService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub task_service: TaskService,
    pub project_service: ProjectService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let project_repo = ProjectRepository::new(db_pool.clone());
        let task_repo = TaskRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());

        let auth_service = AuthService::new(jwt_secret);
        let task_service = TaskService::new(
            task_repo.clone(),
            project_repo.clone(),
            user_repo,
            db_pool.clone(),
        );
        let project_service =
            ProjectService::new(project_repo.clone(), task_repo.clone(), db_pool.clone());
        let dashboard_service = DashboardService::new(task_repo, project_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            task_service,
            project_service,
            dashboard_service,
        })
    }
}
