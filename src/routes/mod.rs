//! Rotas HTTP
//!
//! Cada módulo expõe um `create_*_router` genérico sobre o `Store`,
//! aninhado em `/api` por [`create_api_router`].

pub mod cron_routes;
pub mod health_routes;
pub mod locacao_routes;
pub mod movimentacao_routes;
pub mod vistoria_routes;

use axum::Router;

use crate::repositories::Store;
use crate::state::AppState;

pub fn create_api_router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .nest("/api/locacoes", locacao_routes::create_locacao_router())
        .nest("/api/vistorias", vistoria_routes::create_vistoria_router())
        .nest("/api/movimentacoes", movimentacao_routes::create_movimentacao_router())
        .nest("/api/cron", cron_routes::create_cron_router())
        .merge(health_routes::create_health_router())
}
