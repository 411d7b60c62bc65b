// src/services/task_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, ordering},
    db::{ProjectRepository, TaskRepository, UserRepository},
    models::{
        project::Project,
        task::{TaskStatus, TaskWithAssignee},
        user::UserSnapshot,
    },
};

// Nome do projeto criado automaticamente no onboarding do tenant.
const DEFAULT_PROJECT_NAME: &str = "My Project";

#[derive(Clone)]
pub struct TaskService {
    task_repo: TaskRepository,
    project_repo: ProjectRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl TaskService {
    pub fn new(
        task_repo: TaskRepository,
        project_repo: ProjectRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            task_repo,
            project_repo,
            user_repo,
            pool,
        }
    }

    // Resolve o projeto-fallback do tenant: o mais antigo, criado
    // automaticamente na primeira vez que o tenant aparece sem nenhum.
    async fn get_or_create_first_project(&self, org_id: &str) -> Result<Project, AppError> {
        if let Some(project) = self.project_repo.find_first(&self.pool, org_id).await? {
            return Ok(project);
        }

        self.project_repo
            .create(&self.pool, org_id, DEFAULT_PROJECT_NAME)
            .await
    }

    // Cria uma tarefa no fim da coluna de destino e devolve só o id novo.
    // Sem projectId explícito, a tarefa vai para o primeiro projeto do
    // tenant. O snapshot do ator é atualizado de forma oportunista.
    pub async fn create_task(
        &self,
        org_id: &str,
        actor: Option<&UserSnapshot>,
        title: &str,
        description: Option<&str>,
        project_id: Option<Uuid>,
        status: TaskStatus,
    ) -> Result<Uuid, AppError> {
        let target_project = match project_id {
            Some(id) => self
                .project_repo
                .find_by_id(&self.pool, org_id, id)
                .await?
                .ok_or(AppError::ProjectNotFound)?,
            None => self.get_or_create_first_project(org_id).await?,
        };

        if let Some(snapshot) = actor {
            self.user_repo.upsert_snapshot(&self.pool, snapshot).await?;
        }

        // max + insert na mesma transação. Criadores concorrentes no mesmo
        // escopo ainda podem colidir no "order"; isso é aceito (ver
        // common::ordering) em vez de serializar as inserções.
        let mut tx = self.pool.begin().await?;

        let max = self
            .task_repo
            .max_order(&mut *tx, target_project.id, status)
            .await?;

        let task = self
            .task_repo
            .create(
                &mut *tx,
                org_id,
                target_project.id,
                title,
                description,
                status,
                ordering::next_order(max),
                actor.map(|snapshot| snapshot.id.as_str()),
            )
            .await?;

        tx.commit().await?;

        Ok(task.id)
    }

    // Movimentação de coluna sem posição explícita: a tarefa sempre
    // aterrissa no fim da coluna de destino, com status e "order"
    // gravados juntos.
    pub async fn update_task_status(
        &self,
        org_id: &str,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<(), AppError> {
        let task = self
            .task_repo
            .find_by_id(&self.pool, org_id, task_id)
            .await?
            .ok_or(AppError::TaskNotFound)?;

        let mut tx = self.pool.begin().await?;

        let max = self
            .task_repo
            .max_order(&mut *tx, task.project_id, status)
            .await?;

        self.task_repo
            .set_status_and_order(&mut *tx, task.id, status, ordering::next_order(max))
            .await?;

        tx.commit().await?;

        Ok(())
    }

    // Reordenação em lote: "order" = índice na lista enviada, status
    // uniformizado, tudo em uma transação. Tarefas fora da lista não são
    // tocadas; ids de outros tenants são ignorados em silêncio.
    pub async fn reorder_tasks(
        &self,
        org_id: &str,
        task_ids: &[Uuid],
        status: TaskStatus,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (task_id, order) in ordering::reorder_assignments(task_ids) {
            self.task_repo
                .apply_reorder_entry(&mut *tx, org_id, task_id, status, order)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    pub async fn delete_task(&self, org_id: &str, task_id: Uuid) -> Result<(), AppError> {
        let task = self
            .task_repo
            .find_by_id(&self.pool, org_id, task_id)
            .await?
            .ok_or(AppError::TaskNotFound)?;

        self.task_repo.delete(&self.pool, task.id).await?;

        Ok(())
    }

    // Atualização parcial de título/descrição.
    pub async fn update_task(
        &self,
        org_id: &str,
        task_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), AppError> {
        // Mesma semântica de título da criação: sempre sem espaços nas
        // bordas.
        let title = title.map(str::trim);

        let task = self
            .task_repo
            .find_by_id(&self.pool, org_id, task_id)
            .await?
            .ok_or(AppError::TaskNotFound)?;

        self.task_repo
            .update_fields(&self.pool, task.id, title, description)
            .await?;

        Ok(())
    }

    // Listagem do quadro. Sem projectId, cai no primeiro projeto do tenant
    // (criando-o se necessário, para o onboarding devolver um quadro vazio
    // em vez de erro).
    pub async fn get_tasks(
        &self,
        org_id: &str,
        project_id: Option<Uuid>,
    ) -> Result<Vec<TaskWithAssignee>, AppError> {
        let target_project_id = match project_id {
            Some(id) => id,
            None => self.get_or_create_first_project(org_id).await?.id,
        };

        self.task_repo
            .find_all(&self.pool, org_id, Some(target_project_id))
            .await
    }

    // Todas as tarefas do tenant, para o poller que filtra por projeto no
    // cliente.
    pub async fn get_all_tasks(&self, org_id: &str) -> Result<Vec<TaskWithAssignee>, AppError> {
        self.task_repo.find_all(&self.pool, org_id, None).await
    }

    // Bootstrap do quadro: projetos (com o primeiro garantido), todas as
    // tarefas do tenant e o projeto selecionado por padrão.
    pub async fn get_board(
        &self,
        org_id: &str,
    ) -> Result<(Vec<Project>, Vec<TaskWithAssignee>, Uuid), AppError> {
        let first_project = self.get_or_create_first_project(org_id).await?;
        let projects = self.project_repo.find_all(&self.pool, org_id).await?;
        let tasks = self.task_repo.find_all(&self.pool, org_id, None).await?;

        Ok((projects, tasks, first_project.id))
    }
}
