// src/common/ordering.rs

// Modelo de ordenação das tarefas dentro de uma coluna.
//
// O escopo de ordenação é o par (projeto, status). Criações concorrentes no
// mesmo escopo podem disputar o `max` e produzir valores repetidos ou com
// buracos; isso é aceito em vez de serializar todas as inserções. O contrato
// é só que `order` crescente dentro do escopo dá a sequência de exibição, e
// os clientes desempatam de forma estável por (order, created_at).

use uuid::Uuid;

// Próximo `order` para um escopo: max + 1, começando em 1 quando o escopo
// está vazio.
pub fn next_order(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

// Atribuições de um reorder completo: `order` = índice na lista enviada,
// base 0. A mesma lista produz sempre a mesma atribuição.
pub fn reorder_assignments(ids: &[Uuid]) -> impl Iterator<Item = (Uuid, i32)> + '_ {
    ids.iter().enumerate().map(|(index, id)| (*id, index as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_order_starts_at_one_for_empty_scope() {
        assert_eq!(next_order(None), 1);
    }

    #[test]
    fn next_order_is_strictly_increasing() {
        let mut max = None;
        let mut previous = 0;
        for _ in 0..5 {
            let assigned = next_order(max);
            assert!(assigned > previous);
            previous = assigned;
            max = Some(assigned);
        }
    }

    #[test]
    fn reorder_assigns_index_as_order() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let assignments: Vec<(Uuid, i32)> = reorder_assignments(&ids).collect();
        assert_eq!(assignments[0], (ids[0], 0));
        assert_eq!(assignments[1], (ids[1], 1));
        assert_eq!(assignments[2], (ids[2], 2));
    }

    #[test]
    fn reorder_is_idempotent_for_the_same_list() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let first: Vec<(Uuid, i32)> = reorder_assignments(&ids).collect();
        let second: Vec<(Uuid, i32)> = reorder_assignments(&ids).collect();
        assert_eq!(first, second);
    }
}
