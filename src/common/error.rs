use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros de domínio. Cada variante tem uma chave de mensagem traduzível.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    // Registro inexistente OU de outra conta: os dois casos são indistinguíveis.
    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("A exclusão final da conta não removeu nenhum registro")]
    DeletionFailed,

    #[error("Não é permitido excluir a própria conta")]
    CannotDeleteOwnAccount,

    #[error("Registro ainda referenciado por outro cadastro")]
    RecordInUse,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` guarda o contexto de falhas inesperadas.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O erro que de fato sai pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::RecordInUse => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::CannotDeleteOwnAccount => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave usada para buscar a mensagem no `I18nStore`.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::DeletionFailed => "deletion_failed",
            AppError::CannotDeleteOwnAccount => "cannot_delete_own_account",
            AppError::RecordInUse => "record_in_use",
            _ => "internal_error",
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log, nunca na resposta.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let mut message = store.translate(&locale.0, self.message_key()).to_string();
        if let AppError::NotFound(entity) = self {
            message = format!("{} ({})", message, entity);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| Value::String(m.to_string()))
                                .unwrap_or_else(|| Value::String(e.code.to_string()))
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(codes));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: message,
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Fallback para quem não tem o idioma em mãos (ex.: middlewares).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_deletion_failed_map_to_distinct_statuses() {
        assert_eq!(AppError::NotFound("Conta").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DeletionFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::CannotDeleteOwnAccount.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::RecordInUse.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn api_error_is_localized() {
        let store = I18nStore::default();

        let pt = AppError::NotFound("Conta").to_api_error(&Locale("pt".into()), &store);
        assert_eq!(pt.error, "Registro não encontrado. (Conta)");

        let en = AppError::DeletionFailed.to_api_error(&Locale("en".into()), &store);
        assert_eq!(en.error, "Deletion failed.");
        assert!(en.details.is_none());
    }
}
