// tests/scenarios.rs

// Cenários de ponta a ponta contra um Postgres real. Ignorados por
// padrão; rode com `cargo test -- --ignored` com DATABASE_URL apontando
// para um banco descartável.

use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use taskboard_backend::common::error::AppError;
use taskboard_backend::db::{ProjectRepository, TaskRepository, UserRepository};
use taskboard_backend::models::task::{TaskStatus, TaskWithAssignee};
use taskboard_backend::services::{DashboardService, ProjectService, TaskService};

struct TestContext {
    tasks: TaskService,
    projects: ProjectService,
    dashboard: DashboardService,
    org_id: String,
}

async fn setup() -> TestContext {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL deve apontar para um banco de teste");
    let pool: PgPool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("falha ao conectar no banco de teste");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("falha ao rodar as migrações");

    let project_repo = ProjectRepository::new(pool.clone());
    let task_repo = TaskRepository::new(pool.clone());
    let user_repo = UserRepository::new(pool.clone());

    TestContext {
        tasks: TaskService::new(
            task_repo.clone(),
            project_repo.clone(),
            user_repo,
            pool.clone(),
        ),
        projects: ProjectService::new(project_repo.clone(), task_repo.clone(), pool.clone()),
        dashboard: DashboardService::new(task_repo, project_repo, pool),
        // Cada teste opera em um tenant novo; nada a limpar entre testes.
        org_id: format!("org_{}", Uuid::new_v4().simple()),
    }
}

async fn create_titled(
    ctx: &TestContext,
    title: &str,
    project_id: Option<Uuid>,
    status: TaskStatus,
) -> Uuid {
    ctx.tasks
        .create_task(&ctx.org_id, None, title, None, project_id, status)
        .await
        .expect("create_task deveria suceder")
}

fn order_of(tasks: &[TaskWithAssignee], id: Uuid) -> i32 {
    tasks
        .iter()
        .find(|t| t.task.id == id)
        .map(|t| t.task.order)
        .expect("tarefa deveria estar na listagem")
}

// Cenário A: tenant sem projetos ganha "My Project" no primeiro getTasks.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn first_read_bootstraps_the_default_project() {
    let ctx = setup().await;

    let tasks = ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
    assert!(tasks.is_empty());

    let projects = ctx.projects.get_projects(&ctx.org_id).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "My Project");

    // Segunda leitura reutiliza o mesmo projeto.
    ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
    let projects = ctx.projects.get_projects(&ctx.org_id).await.unwrap();
    assert_eq!(projects.len(), 1);
}

// P1: ordem estritamente crescente por criação dentro do mesmo escopo.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn sequential_creates_get_increasing_orders() {
    let ctx = setup().await;

    let mut previous = 0;
    for title in ["t1", "t2", "t3", "t4"] {
        let id = create_titled(&ctx, title, None, TaskStatus::Planned).await;
        let tasks = ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
        let order = order_of(&tasks, id);
        assert!(order > previous, "{title}: {order} <= {previous}");
        previous = order;
    }
}

// P2: nenhuma leitura escopada em A devolve dados de B.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn tenants_never_see_each_other() {
    let ctx_a = setup().await;
    let ctx_b = setup().await;

    let a_task = create_titled(&ctx_a, "only in a", None, TaskStatus::Planned).await;
    create_titled(&ctx_b, "only in b", None, TaskStatus::Planned).await;

    let b_tasks = ctx_b.tasks.get_all_tasks(&ctx_b.org_id).await.unwrap();
    assert!(b_tasks.iter().all(|t| t.task.id != a_task));
    assert!(b_tasks.iter().all(|t| t.task.org_id == ctx_b.org_id));

    // Mutação cruzada também falha como not-found.
    let crossed = ctx_b.tasks.delete_task(&ctx_b.org_id, a_task).await;
    assert!(matches!(crossed, Err(AppError::TaskNotFound)));
    let a_tasks = ctx_a.tasks.get_all_tasks(&ctx_a.org_id).await.unwrap();
    assert_eq!(a_tasks.len(), 1);
}

// P3 / cenário B: piso de um projeto e gate de plano.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn last_project_floor_and_plan_gate() {
    let ctx = setup().await;

    let first = ctx
        .projects
        .create_project(&ctx.org_id, false, "Only One")
        .await
        .unwrap();

    // Free tier: o segundo projeto é barrado e a contagem não muda.
    let denied = ctx.projects.create_project(&ctx.org_id, false, "Second").await;
    assert!(matches!(denied, Err(AppError::PlanLimit)));
    assert_eq!(ctx.projects.get_projects(&ctx.org_id).await.unwrap().len(), 1);

    // Último projeto não sai.
    let floor = ctx.projects.delete_project(&ctx.org_id, first).await;
    assert!(matches!(floor, Err(AppError::LastProject)));
    assert_eq!(ctx.projects.get_projects(&ctx.org_id).await.unwrap().len(), 1);

    // Com "pro" o segundo projeto entra, e aí o primeiro pode sair.
    let second = ctx
        .projects
        .create_project(&ctx.org_id, true, "Second")
        .await
        .unwrap();
    ctx.projects.delete_project(&ctx.org_id, first).await.unwrap();
    let remaining = ctx.projects.get_projects(&ctx.org_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);
}

// P4: excluir um projeto leva junto todas as suas tarefas.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn project_delete_cascades_to_tasks() {
    let ctx = setup().await;

    let keep = ctx
        .projects
        .create_project(&ctx.org_id, true, "Keep")
        .await
        .unwrap();
    let doomed = ctx
        .projects
        .create_project(&ctx.org_id, true, "Doomed")
        .await
        .unwrap();

    for title in ["d1", "d2", "d3"] {
        create_titled(&ctx, title, Some(doomed), TaskStatus::Planned).await;
    }
    let survivor = create_titled(&ctx, "k1", Some(keep), TaskStatus::Planned).await;

    ctx.projects.delete_project(&ctx.org_id, doomed).await.unwrap();

    let remaining = ctx.tasks.get_all_tasks(&ctx.org_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].task.id, survivor);
}

// P5 + cenário C: reorder grava índice como ordem e é idempotente.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn reorder_assigns_indexes_and_is_idempotent() {
    let ctx = setup().await;

    let t1 = create_titled(&ctx, "T1", None, TaskStatus::Planned).await;
    let t2 = create_titled(&ctx, "T2", None, TaskStatus::Planned).await;
    let t3 = create_titled(&ctx, "T3", None, TaskStatus::Planned).await;

    let before = ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
    assert!(order_of(&before, t1) < order_of(&before, t2));
    assert!(order_of(&before, t2) < order_of(&before, t3));

    let wanted = vec![t3, t1, t2];
    ctx.tasks
        .reorder_tasks(&ctx.org_id, &wanted, TaskStatus::Planned)
        .await
        .unwrap();

    let listed = ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|t| t.task.id).collect();
    assert_eq!(ids, wanted);
    assert_eq!(order_of(&listed, t3), 0);
    assert_eq!(order_of(&listed, t1), 1);
    assert_eq!(order_of(&listed, t2), 2);

    // Repetir a mesma lista não muda nada.
    ctx.tasks
        .reorder_tasks(&ctx.org_id, &wanted, TaskStatus::Planned)
        .await
        .unwrap();
    let again = ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
    assert_eq!(
        again.iter().map(|t| t.task.id).collect::<Vec<_>>(),
        wanted
    );
}

// P6 / cenário D: mudança de status aterrissa no fim da coluna destino.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn status_move_lands_at_the_end_of_the_column() {
    let ctx = setup().await;

    let moved = create_titled(&ctx, "moved", None, TaskStatus::Planned).await;
    let done_a = create_titled(&ctx, "done a", None, TaskStatus::Done).await;
    let done_b = create_titled(&ctx, "done b", None, TaskStatus::Done).await;

    ctx.tasks
        .update_task_status(&ctx.org_id, moved, TaskStatus::Done)
        .await
        .unwrap();

    let tasks = ctx.tasks.get_tasks(&ctx.org_id, None).await.unwrap();
    let moved_order = order_of(&tasks, moved);
    assert!(moved_order > order_of(&tasks, done_a));
    assert!(moved_order > order_of(&tasks, done_b));
    let status = tasks
        .iter()
        .find(|t| t.task.id == moved)
        .map(|t| t.task.status)
        .unwrap();
    assert_eq!(status, TaskStatus::Done);
}

// Cenário E: id inexistente para o tenant é not-found, sem efeito algum.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn deleting_an_unknown_task_is_a_clean_not_found() {
    let ctx = setup().await;
    create_titled(&ctx, "still here", None, TaskStatus::Planned).await;

    let result = ctx.tasks.delete_task(&ctx.org_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::TaskNotFound)));

    let tasks = ctx.tasks.get_all_tasks(&ctx.org_id).await.unwrap();
    assert_eq!(tasks.len(), 1);
}

// Atualização parcial preserva o que não foi enviado.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn partial_update_keeps_untouched_fields() {
    let ctx = setup().await;

    let id = ctx
        .tasks
        .create_task(
            &ctx.org_id,
            None,
            "original",
            Some("description stays"),
            None,
            TaskStatus::Planned,
        )
        .await
        .unwrap();

    ctx.tasks
        .update_task(&ctx.org_id, id, Some("  renamed  "), None)
        .await
        .unwrap();

    let tasks = ctx.tasks.get_all_tasks(&ctx.org_id).await.unwrap();
    // O título entra sem os espaços das bordas, como na criação.
    assert_eq!(tasks[0].task.title, "renamed");
    assert_eq!(tasks[0].task.description.as_deref(), Some("description stays"));
}

// Agregados do dashboard: baldes por status, recentes e por projeto.
#[tokio::test]
#[ignore = "requer Postgres via DATABASE_URL"]
async fn dashboard_stats_reflect_the_board() {
    let ctx = setup().await;

    create_titled(&ctx, "p1", None, TaskStatus::Planned).await;
    create_titled(&ctx, "p2", None, TaskStatus::Planned).await;
    create_titled(&ctx, "w1", None, TaskStatus::InProgress).await;
    let finished = create_titled(&ctx, "d1", None, TaskStatus::Done).await;

    let stats = ctx.dashboard.get_stats(&ctx.org_id).await.unwrap();
    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.tasks_by_status.planned, 2);
    assert_eq!(stats.tasks_by_status.in_progress, 1);
    assert_eq!(stats.tasks_by_status.done, 1);
    assert_eq!(stats.project_count, 1);
    assert_eq!(stats.projects.len(), 1);
    assert_eq!(stats.projects[0].task_count, 4);

    // A tarefa tocada por último encabeça os recentes.
    ctx.tasks
        .update_task(&ctx.org_id, finished, Some("d1 touched"), None)
        .await
        .unwrap();
    let stats = ctx.dashboard.get_stats(&ctx.org_id).await.unwrap();
    assert_eq!(stats.recent_tasks[0].task.id, finished);
}
