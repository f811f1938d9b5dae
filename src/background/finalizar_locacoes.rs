//! Finalização periódica de locações vencidas
//!
//! Roda `finalizar_expiradas` no intervalo configurado
//! (`FINALIZE_INTERVAL_SECS`) até o token de cancelamento disparar.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::repositories::Store;
use crate::services::LocacaoService;

pub async fn run<S: Store>(service: LocacaoService<S>, intervalo: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = intervalo.as_secs(),
        "⏰ Job de finalização de locações iniciado"
    );

    let mut interval = tokio::time::interval(intervalo);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("⏰ Job de finalização de locações encerrando");
                break;
            }
            _ = interval.tick() => {
                match service.finalizar_expiradas(Utc::now().date_naive()).await {
                    Ok(ids) if ids.is_empty() => {
                        tracing::debug!("Nenhuma locação expirada");
                    }
                    Ok(ids) => {
                        tracing::info!(total = ids.len(), "⏰ Locações expiradas finalizadas pelo job");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "❌ Falha ao finalizar locações expiradas");
                    }
                }
            }
        }
    }
}
