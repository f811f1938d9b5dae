//! Estado compartilhado da aplicação
//!
//! Este módulo define o estado que é passado pelo router do Axum e
//! constrói os serviços a partir dele.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::Store;
use crate::services::{
    ConciliadorFinanceiro, LocacaoService, MovimentacaoService, VistoriaService,
};

#[derive(Clone)]
pub struct AppState<S: Store> {
    pub store: S,
    pub config: Arc<EnvironmentConfig>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, config: EnvironmentConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn locacao_service(&self) -> LocacaoService<S> {
        let conciliador = ConciliadorFinanceiro::new(
            self.store.clone(),
            self.config.ledger_retry_attempts,
            self.config.ledger_retry_backoff,
        );
        LocacaoService::new(self.store.clone(), conciliador, self.config.ledger_on_create)
    }

    pub fn vistoria_service(&self) -> VistoriaService<S> {
        VistoriaService::new(self.store.clone())
    }

    pub fn movimentacao_service(&self) -> MovimentacaoService<S> {
        MovimentacaoService::new(self.store.clone())
    }
}
