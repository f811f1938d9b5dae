use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::dto::api_response::ApiResponse;
use crate::models::DbId;
use crate::repositories::Store;
use crate::services::LocacaoService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct FinalizacaoResponse {
    pub finalizadas: Vec<DbId>,
}

pub struct CronController<S: Store> {
    service: LocacaoService<S>,
    cron_secret: Option<String>,
}

impl<S: Store> CronController<S> {
    pub fn new(state: &AppState<S>) -> Self {
        Self {
            service: state.locacao_service(),
            cron_secret: state.config.cron_secret.clone(),
        }
    }

    /// Finaliza as locações vencidas. Exige o header `x-cron-secret`.
    pub async fn finalize_locacoes(
        &self,
        secret: Option<&str>,
    ) -> AppResult<ApiResponse<FinalizacaoResponse>> {
        let Some(esperado) = self.cron_secret.as_deref() else {
            error!("❌ CRON_SECRET não configurado");
            return Err(AppError::Internal("Erro de configuração do servidor".to_string()));
        };
        if secret != Some(esperado) {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        let finalizadas = self
            .service
            .finalizar_expiradas(Utc::now().date_naive())
            .await?;

        let message = if finalizadas.is_empty() {
            "Nenhuma locação expirada encontrada.".to_string()
        } else {
            format!("Processo finalizado. {} locações finalizadas.", finalizadas.len())
        };
        Ok(ApiResponse::success_with_message(
            FinalizacaoResponse { finalizadas },
            message,
        ))
    }
}
