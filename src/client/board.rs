// src/client/board.rs

use std::collections::VecDeque;

use uuid::Uuid;

use crate::models::task::{Task, TaskStatus};

// Uma mutação local aplicada antes da confirmação do servidor.
#[derive(Debug, Clone)]
pub enum BoardAction {
    UpdateStatus { task_id: Uuid, status: TaskStatus },
    // Substitui a lista inteira (resultado de um drag-and-drop).
    Reorder { tasks: Vec<Task> },
    Add { task: Task },
    Delete { task_id: Uuid },
}

// Reducer puro: mesma lista + mesma ação = mesmo resultado, sem mutação
// do estado de entrada.
pub fn apply(tasks: &[Task], action: &BoardAction) -> Vec<Task> {
    match action {
        BoardAction::UpdateStatus { task_id, status } => tasks
            .iter()
            .map(|task| {
                if task.id == *task_id {
                    let mut updated = task.clone();
                    updated.status = *status;
                    updated
                } else {
                    task.clone()
                }
            })
            .collect(),
        BoardAction::Reorder { tasks: replacement } => replacement.clone(),
        BoardAction::Add { task } => {
            let mut next = tasks.to_vec();
            next.push(task.clone());
            next
        }
        BoardAction::Delete { task_id } => tasks
            .iter()
            .filter(|task| task.id != *task_id)
            .cloned()
            .collect(),
    }
}

// Estado do quadro: a lista confirmada pelo servidor mais a fila ordenada
// de ações pendentes. O que a UI mostra é sempre derivado dos dois; nunca
// se escreve direto no confirmado a partir de uma ação pendente.
#[derive(Debug, Default)]
pub struct BoardState {
    confirmed: Vec<Task>,
    pending: VecDeque<BoardAction>,
}

impl BoardState {
    pub fn new(confirmed: Vec<Task>) -> Self {
        Self {
            confirmed,
            pending: VecDeque::new(),
        }
    }

    // Registra uma ação otimista. A mutação correspondente no servidor
    // corre por fora; se ela falhar, o chamador loga e o próximo ciclo de
    // sincronização corrige a tela (sem rollback local).
    pub fn dispatch(&mut self, action: BoardAction) {
        self.pending.push_back(action);
    }

    // Estado autoritativo chegou: substitui o confirmado e descarta a
    // fila inteira de pendências, confirmadas ou não.
    pub fn reconcile(&mut self, server_tasks: Vec<Task>) {
        self.confirmed = server_tasks;
        self.pending.clear();
    }

    // A lista exibida, recomputada como um fold das pendências sobre o
    // confirmado.
    pub fn displayed(&self) -> Vec<Task> {
        self.pending
            .iter()
            .fold(self.confirmed.clone(), |tasks, action| apply(&tasks, action))
    }

    // Uma coluna do quadro, na ordem de exibição: `order` crescente com
    // desempate estável por created_at.
    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .displayed()
            .into_iter()
            .filter(|task| task.status == status)
            .collect();
        tasks.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        tasks
    }

    // Ids por coluna, na ordem de exibição: é o payload de um reorder.
    pub fn ids_by_column(&self, status: TaskStatus) -> Vec<Uuid> {
        self.column(status).into_iter().map(|task| task.id).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn task(title: &str, status: TaskStatus, order: i32) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            org_id: "org_1".to_string(),
            project_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status,
            order,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_does_not_touch_the_input() {
        let tasks = vec![task("a", TaskStatus::Planned, 1)];
        let action = BoardAction::Delete {
            task_id: tasks[0].id,
        };
        let result = apply(&tasks, &action);
        assert!(result.is_empty());
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn dispatched_status_change_shows_up_in_displayed() {
        let base = task("a", TaskStatus::Planned, 1);
        let mut state = BoardState::new(vec![base.clone()]);

        state.dispatch(BoardAction::UpdateStatus {
            task_id: base.id,
            status: TaskStatus::Done,
        });

        let displayed = state.displayed();
        assert_eq!(displayed[0].status, TaskStatus::Done);
        // O confirmado segue intacto.
        assert_eq!(state.confirmed[0].status, TaskStatus::Planned);
    }

    #[test]
    fn pending_actions_stack_in_dispatch_order() {
        let a = task("a", TaskStatus::Planned, 1);
        let mut state = BoardState::new(vec![a.clone()]);

        let b = task("b", TaskStatus::Planned, 2);
        state.dispatch(BoardAction::Add { task: b.clone() });
        state.dispatch(BoardAction::Delete { task_id: a.id });

        let displayed = state.displayed();
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].id, b.id);
    }

    #[test]
    fn reconcile_discards_the_pending_queue() {
        let a = task("a", TaskStatus::Planned, 1);
        let mut state = BoardState::new(vec![a.clone()]);
        state.dispatch(BoardAction::Delete { task_id: a.id });
        assert_eq!(state.pending_count(), 1);

        // O servidor ainda conhece a tarefa: a tela volta à verdade dele.
        state.reconcile(vec![a.clone()]);

        assert_eq!(state.pending_count(), 0);
        assert_eq!(state.displayed().len(), 1);
    }

    #[test]
    fn column_sorts_by_order_then_created_at() {
        let mut early = task("early", TaskStatus::Planned, 2);
        early.created_at = Utc::now() - Duration::seconds(60);
        let late = task("late", TaskStatus::Planned, 2);
        let first = task("first", TaskStatus::Planned, 1);
        let other = task("other", TaskStatus::Done, 1);

        let state = BoardState::new(vec![late.clone(), early.clone(), first.clone(), other]);

        let column = state.column(TaskStatus::Planned);
        let titles: Vec<&str> = column.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "early", "late"]);
    }

    #[test]
    fn reorder_replaces_the_whole_list() {
        let a = task("a", TaskStatus::Planned, 1);
        let b = task("b", TaskStatus::Planned, 2);
        let mut state = BoardState::new(vec![a.clone(), b.clone()]);

        let mut b_first = b.clone();
        b_first.order = 0;
        let mut a_second = a.clone();
        a_second.order = 1;
        state.dispatch(BoardAction::Reorder {
            tasks: vec![b_first, a_second],
        });

        let ids = state.ids_by_column(TaskStatus::Planned);
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
