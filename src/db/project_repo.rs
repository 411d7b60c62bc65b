// src/db/project_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{dashboard::ProjectTaskCount, project::Project},
};

// Toda consulta leva o predicado de tenant explícito: nenhuma linha de
// outra organização pode ser construída ou retornada por aqui.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O "primeiro projeto" do tenant: menor created_at. A semântica de
    // projeto-fallback da criação de tarefas depende desta ordenação.
    pub async fn find_first<'e, E>(
        &self,
        executor: E,
        org_id: &str,
    ) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, org_id, name, created_at
            FROM projects
            WHERE org_id = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(org_id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        project_id: Uuid,
    ) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, org_id, name, created_at
            FROM projects
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(project_id)
        .bind(org_id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    pub async fn find_all<'e, E>(
        &self,
        executor: E,
        org_id: &str,
    ) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, org_id, name, created_at
            FROM projects
            WHERE org_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(executor)
        .await?;

        Ok(projects)
    }

    pub async fn count<'e, E>(&self, executor: E, org_id: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM projects WHERE org_id = $1
            "#,
        )
        .bind(org_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        name: &str,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (org_id, name)
            VALUES ($1, $2)
            RETURNING id, org_id, name, created_at
            "#,
        )
        .bind(org_id)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    pub async fn rename<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        project_id: Uuid,
        name: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $3
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(project_id)
        .bind(org_id)
        .bind(name)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, project_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM projects WHERE id = $1
            "#,
        )
        .bind(project_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // Projetos do tenant com a contagem de tarefas de cada um, na mesma
    // ordenação estável por criação da listagem normal.
    pub async fn find_all_with_task_count<'e, E>(
        &self,
        executor: E,
        org_id: &str,
    ) -> Result<Vec<ProjectTaskCount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let counts = sqlx::query_as::<_, ProjectTaskCount>(
            r#"
            SELECT p.id, p.name, COUNT(t.id) AS task_count
            FROM projects p
            LEFT JOIN tasks t ON t.project_id = p.id
            WHERE p.org_id = $1
            GROUP BY p.id, p.name, p.created_at
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(executor)
        .await?;

        Ok(counts)
    }
}
