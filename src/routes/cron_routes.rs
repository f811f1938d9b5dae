use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};

use crate::controllers::cron_controller::{CronController, FinalizacaoResponse};
use crate::dto::api_response::ApiResponse;
use crate::repositories::Store;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

pub fn create_cron_router<S: Store>() -> Router<AppState<S>> {
    Router::new().route("/finalize-locacoes", post(finalize_locacoes::<S>))
}

async fn finalize_locacoes<S: Store>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<FinalizacaoResponse>>, AppError> {
    let secret = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    let response = CronController::new(&state).finalize_locacoes(secret).await?;
    Ok(Json(response))
}
