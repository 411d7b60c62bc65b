// src/db/task_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        task::{Task, TaskStatus, TaskWithAssignee},
        user::UserSnapshot,
    },
};

// Linha da listagem enriquecida: tarefa + colunas do snapshot do
// responsável vindas do LEFT JOIN.
#[derive(FromRow)]
struct TaskAssigneeRow {
    id: Uuid,
    org_id: String,
    project_id: Uuid,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    order: i32,
    assignee_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    assignee_email: Option<String>,
    assignee_first_name: Option<String>,
    assignee_last_name: Option<String>,
    assignee_image_url: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assignee = row.assignee_id.clone().map(|id| UserSnapshot {
            id,
            email: row.assignee_email,
            first_name: row.assignee_first_name,
            last_name: row.assignee_last_name,
            image_url: row.assignee_image_url,
        });

        TaskWithAssignee {
            task: Task {
                id: row.id,
                org_id: row.org_id,
                project_id: row.project_id,
                title: row.title,
                description: row.description,
                status: row.status,
                order: row.order,
                assignee_id: row.assignee_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            assignee,
        }
    }
}

const SELECT_WITH_ASSIGNEE: &str = r#"
    SELECT
        t.id, t.org_id, t.project_id, t.title, t.description,
        t.status, t."order", t.assignee_id, t.created_at, t.updated_at,
        u.email      AS assignee_email,
        u.first_name AS assignee_first_name,
        u.last_name  AS assignee_last_name,
        u.image_url  AS assignee_image_url
    FROM tasks t
    LEFT JOIN users u ON u.id = t.assignee_id
"#;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        task_id: Uuid,
    ) -> Result<Option<Task>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, org_id, project_id, title, description,
                   status, "order", assignee_id, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(task_id)
        .bind(org_id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    // Listagem para o quadro: escopo do tenant, filtro opcional de projeto,
    // "order" crescente com desempate estável por criação.
    pub async fn find_all<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        project_id: Option<Uuid>,
    ) -> Result<Vec<TaskWithAssignee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{SELECT_WITH_ASSIGNEE}
            WHERE t.org_id = $1
              AND ($2::uuid IS NULL OR t.project_id = $2)
            ORDER BY t."order" ASC, t.created_at ASC
            "#
        );

        let rows = sqlx::query_as::<_, TaskAssigneeRow>(&sql)
            .bind(org_id)
            .bind(project_id)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // Listagem para o dashboard: mais recentemente atualizadas primeiro.
    pub async fn find_all_by_updated<'e, E>(
        &self,
        executor: E,
        org_id: &str,
    ) -> Result<Vec<TaskWithAssignee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{SELECT_WITH_ASSIGNEE}
            WHERE t.org_id = $1
            ORDER BY t.updated_at DESC, t.id
            "#
        );

        let rows = sqlx::query_as::<_, TaskAssigneeRow>(&sql)
            .bind(org_id)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // Maior "order" do escopo (projeto, status); None para escopo vazio.
    pub async fn max_order<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let max = sqlx::query_scalar::<_, Option<i32>>(
            r#"
            SELECT MAX("order") FROM tasks
            WHERE project_id = $1 AND status = $2
            "#,
        )
        .bind(project_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(max)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        project_id: Uuid,
        title: &str,
        description: Option<&str>,
        status: TaskStatus,
        order: i32,
        assignee_id: Option<&str>,
    ) -> Result<Task, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (org_id, project_id, title, description, status, "order", assignee_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, org_id, project_id, title, description,
                      status, "order", assignee_id, created_at, updated_at
            "#,
        )
        .bind(org_id)
        .bind(project_id)
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(order)
        .bind(assignee_id)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    // Movimentação de coluna: status e "order" gravados juntos.
    pub async fn set_status_and_order<'e, E>(
        &self,
        executor: E,
        task_id: Uuid,
        status: TaskStatus,
        order: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = $2, "order" = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(task_id)
        .bind(status)
        .bind(order)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // Uma atribuição do reorder em lote. O predicado de org faz ids de
    // outros tenants serem silenciosamente ignorados, não errados.
    pub async fn apply_reorder_entry<'e, E>(
        &self,
        executor: E,
        org_id: &str,
        task_id: Uuid,
        status: TaskStatus,
        order: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = $3, "order" = $4, updated_at = now()
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(task_id)
        .bind(org_id)
        .bind(status)
        .bind(order)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // Atualização parcial: só os campos enviados mudam.
    pub async fn update_fields<'e, E>(
        &self,
        executor: E,
        task_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title       = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at  = now()
            WHERE id = $1
            "#,
        )
        .bind(task_id)
        .bind(title)
        .bind(description)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, task_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks WHERE id = $1
            "#,
        )
        .bind(task_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // Cascata explícita da exclusão de projeto.
    pub async fn delete_by_project<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
