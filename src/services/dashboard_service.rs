// src/services/dashboard_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, TaskRepository},
    models::{
        dashboard::{DashboardStats, TasksByStatus},
        task::{TaskStatus, TaskWithAssignee},
    },
};

const RECENT_TASKS_LIMIT: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    task_repo: TaskRepository,
    project_repo: ProjectRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(task_repo: TaskRepository, project_repo: ProjectRepository, pool: PgPool) -> Self {
        Self {
            task_repo,
            project_repo,
            pool,
        }
    }

    // Agregado derivado, recalculado a cada consulta. Uma única passada de
    // leitura dentro de uma transação (snapshot consistente), sem efeitos
    // colaterais e sem cache.
    pub async fn get_stats(&self, org_id: &str) -> Result<DashboardStats, AppError> {
        let mut tx = self.pool.begin().await?;

        let tasks = self.task_repo.find_all_by_updated(&mut *tx, org_id).await?;
        let project_count = self.project_repo.count(&mut *tx, org_id).await?;
        let projects = self
            .project_repo
            .find_all_with_task_count(&mut *tx, org_id)
            .await?;

        tx.commit().await?;

        let tasks_by_status = Self::bucket_by_status(&tasks);
        let total_tasks = tasks.len() as i64;
        // A listagem já vem por updated_at decrescente.
        let recent_tasks = tasks.into_iter().take(RECENT_TASKS_LIMIT).collect();

        Ok(DashboardStats {
            tasks_by_status,
            recent_tasks,
            total_tasks,
            project_count,
            projects,
        })
    }

    // Os três buckets começam em zero: colunas vazias aparecem zeradas na
    // resposta, nunca omitidas.
    fn bucket_by_status(tasks: &[TaskWithAssignee]) -> TasksByStatus {
        let mut buckets = TasksByStatus::default();
        for task in tasks {
            match task.task.status {
                TaskStatus::Planned => buckets.planned += 1,
                TaskStatus::InProgress => buckets.in_progress += 1,
                TaskStatus::Done => buckets.done += 1,
            }
        }
        buckets
    }
}
