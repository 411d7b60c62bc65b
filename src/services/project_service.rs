// src/services/project_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, TaskRepository},
    models::project::Project,
};

#[derive(Clone)]
pub struct ProjectService {
    project_repo: ProjectRepository,
    task_repo: TaskRepository,
    pool: PgPool,
}

impl ProjectService {
    pub fn new(project_repo: ProjectRepository, task_repo: TaskRepository, pool: PgPool) -> Self {
        Self {
            project_repo,
            task_repo,
            pool,
        }
    }

    // Ordenado por criação: a semântica de "primeiro projeto" depende disso.
    pub async fn get_projects(&self, org_id: &str) -> Result<Vec<Project>, AppError> {
        self.project_repo.find_all(&self.pool, org_id).await
    }

    // Gate de plano: o tier gratuito fica limitado a um projeto. A checagem
    // de entitlement é do provedor externo e chega aqui já resolvida.
    pub async fn create_project(
        &self,
        org_id: &str,
        has_pro: bool,
        name: &str,
    ) -> Result<Uuid, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidProjectName);
        }

        if !has_pro {
            let project_count = self.project_repo.count(&self.pool, org_id).await?;
            if project_count >= 1 {
                return Err(AppError::PlanLimit);
            }
        }

        let project = self.project_repo.create(&self.pool, org_id, name).await?;

        Ok(project.id)
    }

    // Invariante de piso: o tenant nunca fica com zero projetos. A cascata
    // projeto -> tarefas é feita explicitamente, dentro da transação.
    pub async fn delete_project(&self, org_id: &str, project_id: Uuid) -> Result<(), AppError> {
        let project = self
            .project_repo
            .find_by_id(&self.pool, org_id, project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        let project_count = self.project_repo.count(&self.pool, org_id).await?;
        if project_count <= 1 {
            return Err(AppError::LastProject);
        }

        let mut tx = self.pool.begin().await?;

        self.task_repo.delete_by_project(&mut *tx, project.id).await?;
        self.project_repo.delete(&mut *tx, project.id).await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn rename_project(
        &self,
        org_id: &str,
        project_id: Uuid,
        name: &str,
    ) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidProjectName);
        }

        let updated = self
            .project_repo
            .rename(&self.pool, org_id, project_id, name)
            .await?;

        if updated == 0 {
            return Err(AppError::ProjectNotFound);
        }

        Ok(())
    }
}
