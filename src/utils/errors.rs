//! Sistema de manejo de errores
//!
//! Este módulo define a taxonomia de erros da locadora e a sua conversão
//! para respostas HTTP no envelope `{ success, error, code, details }`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// SQLSTATE de violação de constraint de exclusão (Postgres).
const EXCLUSION_VIOLATION: &str = "23P01";

/// Erros principais da aplicação
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Veículo indisponível: {0}")]
    VehicleUnavailable(String),

    #[error("Conflito de período: {0}")]
    OverlapConflict(String),

    #[error("Erro de validação: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Erro de validação: {0}")]
    BadRequest(String),

    #[error("Erro de persistência: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    #[error("Erro interno: {0}")]
    Internal(String),
}

/// Resposta de erro da API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl AppError {
    /// Status HTTP correspondente a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::VehicleUnavailable(_)
            | AppError::OverlapConflict(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código estável exposto no envelope de erro
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::VehicleUnavailable(_) => "VEHICLE_UNAVAILABLE",
            AppError::OverlapConflict(_) => "OVERLAP_CONFLICT",
            AppError::Validation(_) | AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Converte a violação da constraint `locacoes_sem_sobreposicao` em
    /// `OverlapConflict`; qualquer outro erro vira `Persistence`.
    pub fn from_overlap_violation(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) {
                return AppError::OverlapConflict(
                    "Veículo já possui locação no período informado".to_string(),
                );
            }
        }
        AppError::Persistence(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Parâmetros inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Parâmetro de rota inválido: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (error, details) = match self {
            AppError::NotFound(msg)
            | AppError::VehicleUnavailable(msg)
            | AppError::OverlapConflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg) => {
                tracing::warn!(code, "⚠️ {}", msg);
                (msg, None)
            }

            AppError::Validation(e) => {
                tracing::warn!(code, "⚠️ Dados inválidos: {}", e);
                ("Os dados informados são inválidos".to_string(), Some(json!(e)))
            }

            AppError::Persistence(e) => {
                tracing::error!(code, error = %e, "❌ Erro de banco de dados");
                (
                    "Erro interno do servidor.".to_string(),
                    Some(json!({ "sql_error": e.to_string() })),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!(code, error = %msg, "❌ Erro interno");
                (
                    "Erro interno do servidor.".to_string(),
                    Some(json!({ "internal_error": msg })),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operações que podem falhar
pub type AppResult<T> = Result<T, AppError>;

/// Função helper para erros de recurso não encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} #{} não encontrado(a)", resource, id))
}

/// Função helper para erros de validação sem campo específico
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
