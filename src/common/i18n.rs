// src/common/i18n.rs

use std::collections::HashMap;

const FALLBACK_LOCALE: &str = "en";

// Catálogo em memória das mensagens voltadas ao usuário, indexado por
// idioma. O idioma da requisição vem do extrator `Locale`; "en" é o
// fallback para idiomas e chaves desconhecidos.
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();

        messages.insert(
            "en",
            HashMap::from([
                (
                    "unauthorized",
                    "You must be in an organization to perform this action",
                ),
                ("task_not_found", "Task not found"),
                ("project_not_found", "Project not found"),
                ("last_project", "Cannot delete your only project"),
                ("plan_limit", "Upgrade to Pro to create multiple projects."),
                ("project_name_required", "Project name cannot be empty"),
                ("invalid_token", "Invalid or missing authentication token"),
                ("validation", "One or more fields are invalid"),
                ("internal", "An unexpected error occurred"),
            ]),
        );

        messages.insert(
            "pt",
            HashMap::from([
                (
                    "unauthorized",
                    "Você precisa estar em uma organização para executar esta ação",
                ),
                ("task_not_found", "Tarefa não encontrada"),
                ("project_not_found", "Projeto não encontrado"),
                ("last_project", "Não é possível excluir o seu único projeto"),
                (
                    "plan_limit",
                    "Faça upgrade para o Pro para criar vários projetos.",
                ),
                ("project_name_required", "O nome do projeto não pode ficar vazio"),
                ("invalid_token", "Token de autenticação inválido ou ausente"),
                ("validation", "Um ou mais campos são inválidos"),
                ("internal", "Ocorreu um erro inesperado"),
            ]),
        );

        Self { messages }
    }

    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.messages
            .get(locale)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.messages
                    .get(FALLBACK_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .copied()
            // Chave desconhecida: devolve a própria chave em vez de esconder o erro.
            .unwrap_or(key)
            .to_string()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
