//! Locadora - gestão do ciclo de vida das locações
//!
//! Serviço HTTP do back-office da locadora: cria, atualiza, finaliza e
//! exclui locações mantendo o status dos veículos, o livro-caixa e as
//! vistorias consistentes.

pub mod background;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_middleware;
use crate::repositories::Store;
use crate::state::AppState;

/// Router completo da API com as camadas de timeout, trace e CORS
pub fn build_router<S: Store>(state: AppState<S>) -> Router {
    let timeout = state.config.request_timeout;

    routes::create_api_router::<S>()
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}
