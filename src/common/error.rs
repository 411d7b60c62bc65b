// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// O erro de domínio. Toda falha das operações de núcleo vira uma destas
// variantes; nada propaga como pânico até a camada de transporte.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Sem organização na sessão: nenhuma operação escopada pode prosseguir.
    #[error("Sem organização na sessão")]
    Unauthorized,

    #[error("Tarefa não encontrada no escopo do tenant")]
    TaskNotFound,

    #[error("Projeto não encontrado no escopo do tenant")]
    ProjectNotFound,

    // Invariante: todo tenant com projetos mantém pelo menos um.
    #[error("O tenant ficaria sem projetos")]
    LastProject,

    // Gate de plano: múltiplos projetos exigem o entitlement "pro".
    #[error("O plano atual não permite múltiplos projetos")]
    PlanLimit,

    #[error("Nome de projeto vazio")]
    InvalidProjectName,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::TaskNotFound | AppError::ProjectNotFound => StatusCode::NOT_FOUND,
            AppError::LastProject | AppError::InvalidProjectName => StatusCode::BAD_REQUEST,
            // Distinto dos 400 genéricos para a UI poder rotear ao billing.
            AppError::PlanLimit => StatusCode::PAYMENT_REQUIRED,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::Unauthorized => "unauthorized",
            AppError::TaskNotFound => "task_not_found",
            AppError::ProjectNotFound => "project_not_found",
            AppError::LastProject => "last_project",
            AppError::PlanLimit => "plan_limit",
            AppError::InvalidProjectName => "project_name_required",
            AppError::InvalidToken => "invalid_token",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "internal",
        }
    }

    // Converte para o erro de borda HTTP, traduzindo a mensagem.
    // Erros inesperados (banco, I/O) são logados aqui com o detalhe completo
    // e saem com mensagem genérica: nenhum detalhe interno vaza ao cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        if let AppError::ValidationError(errors) = self {
            let mut details: Vec<String> = Vec::new();
            for (_field, field_errors) in errors.field_errors() {
                for field_error in field_errors.iter() {
                    if let Some(message) = &field_error.message {
                        details.push(message.to_string());
                    }
                }
            }
            let message = if details.is_empty() {
                store.translate(&locale.0, "validation")
            } else {
                details.join("; ")
            };
            return ApiError {
                status: StatusCode::BAD_REQUEST,
                message,
            };
        }

        if let AppError::DatabaseError(_) | AppError::InternalServerError(_) = self {
            // O detalhe completo (erro fonte incluído) fica no log; só a
            // mensagem genérica atravessa a borda.
            tracing::error!("Erro interno do servidor: {self:?}");
        }

        ApiError {
            status: self.status(),
            message: store.translate(&locale.0, self.message_key()),
        }
    }

    // Mensagem voltada ao usuário, usada pelo envelope ActionResult.
    pub fn user_message(&self, locale: &Locale, store: &I18nStore) -> String {
        self.to_api_error(locale, store).message
    }
}

// O erro que atravessa a borda HTTP (usado como rejeição de extratores
// e retorno dos handlers de leitura).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

// Envelope discriminado das mutações, no formato que o cliente consome:
// `{"success":true,"data":…}` ou `{"success":false,"error":…}`.
// Mutações nunca respondem com status HTTP de erro: toda falha é
// recuperada na borda e vira este formato.
#[derive(Debug)]
pub enum ActionResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ActionResult<T> {
    pub fn from_result(result: Result<T, AppError>, locale: &Locale, store: &I18nStore) -> Self {
        match result {
            Ok(data) => ActionResult::Success(data),
            Err(err) => ActionResult::Failure(err.user_message(locale, store)),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionResult::Success(data) => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            ActionResult::Failure(error) => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn action_result_success_wire_shape() {
        let result: ActionResult<serde_json::Value> = ActionResult::Success(json!({ "id": 7 }));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": true, "data": { "id": 7 } })
        );
    }

    #[test]
    fn action_result_unit_data_serializes_as_null() {
        let result: ActionResult<()> = ActionResult::Success(());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": true, "data": null })
        );
    }

    #[test]
    fn action_result_failure_wire_shape() {
        let store = I18nStore::new();
        let result: ActionResult<()> =
            ActionResult::from_result(Err(AppError::TaskNotFound), &en(), &store);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": false, "error": "Task not found" })
        );
    }

    #[test]
    fn plan_gate_is_distinguishable_from_generic_invariants() {
        let store = I18nStore::new();
        let plan = AppError::PlanLimit.to_api_error(&en(), &store);
        let floor = AppError::LastProject.to_api_error(&en(), &store);
        assert_eq!(plan.status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(floor.status, StatusCode::BAD_REQUEST);
        assert_eq!(plan.message, "Upgrade to Pro to create multiple projects.");
        assert_eq!(floor.message, "Cannot delete your only project");
    }

    #[test]
    fn internal_log_rendering_carries_the_store_detail() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        // O Display é a mensagem fixa da variante; o log usa o Debug, que
        // precisa carregar o erro fonte.
        let logged = format!("{err:?}");
        assert!(logged.contains("PoolTimedOut"), "faltou o detalhe: {logged}");

        let wrapped = AppError::InternalServerError(anyhow::anyhow!("disk full"));
        assert!(format!("{wrapped:?}").contains("disk full"));
    }

    #[test]
    fn store_failures_surface_a_generic_message() {
        let store = I18nStore::new();
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        let api = err.to_api_error(&en(), &store);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "An unexpected error occurred");
    }
}
