//! Conciliação do livro-caixa
//!
//! A transação principal de uma locação devolve uma lista de
//! [`EventoFinanceiro`]; depois do commit, o [`ConciliadorFinanceiro`]
//! aplica cada evento em sua própria transação, com novas tentativas e
//! backoff exponencial. Eventos que esgotam as tentativas são registrados
//! no alvo de log `ledger_dead_letter` e nunca falham a requisição.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::models::movimentacao::{
    descricao_receita_locacao, descricao_receita_seguro, ChaveMovimentacao, NovaMovimentacao,
    TipoMovimentacao, CATEGORIA_LOCACAO, CATEGORIA_SEGURO,
};
use crate::models::DbId;
use crate::repositories::{MovimentacaoRepository, Store, StoreTx};
use crate::utils::errors::AppResult;

#[derive(Debug, Clone, PartialEq)]
pub enum EventoFinanceiro {
    /// Receita de uma locação recém-criada
    ReceitaRegistrada {
        locacao_id: DbId,
        cliente_id: DbId,
        valor: Decimal,
        data: NaiveDate,
    },
    /// `valor_total` mudou numa atualização
    ValorTotalAlterado { locacao_id: DbId, valor: Decimal },
    /// `valor_seguro` definido na criação ou alterado na atualização
    SeguroAlterado {
        locacao_id: DbId,
        cliente_id: DbId,
        valor: Decimal,
        data_locacao: NaiveDate,
    },
}

impl EventoFinanceiro {
    pub fn locacao_id(&self) -> DbId {
        match self {
            EventoFinanceiro::ReceitaRegistrada { locacao_id, .. }
            | EventoFinanceiro::ValorTotalAlterado { locacao_id, .. }
            | EventoFinanceiro::SeguroAlterado { locacao_id, .. } => *locacao_id,
        }
    }
}

#[derive(Clone)]
pub struct ConciliadorFinanceiro<S: Store> {
    store: S,
    tentativas: u32,
    backoff: Duration,
}

impl<S: Store> ConciliadorFinanceiro<S> {
    pub fn new(store: S, tentativas: u32, backoff: Duration) -> Self {
        Self {
            store,
            tentativas: tentativas.max(1),
            backoff,
        }
    }

    /// Aplica os eventos em ordem. Devolve os que esgotaram as tentativas.
    pub async fn aplicar(&self, eventos: Vec<EventoFinanceiro>) -> Vec<EventoFinanceiro> {
        let mut descartados = Vec::new();

        for evento in eventos {
            if !self.aplicar_com_retentativas(&evento).await {
                descartados.push(evento);
            }
        }

        descartados
    }

    async fn aplicar_com_retentativas(&self, evento: &EventoFinanceiro) -> bool {
        for tentativa in 1..=self.tentativas {
            match self.aplicar_evento(evento).await {
                Ok(()) => return true,
                Err(e) if tentativa < self.tentativas => {
                    let espera = self.backoff * 2u32.saturating_pow(tentativa - 1);
                    warn!(
                        locacao_id = evento.locacao_id(),
                        tentativa,
                        error = %e,
                        "⚠️ Falha ao conciliar livro-caixa, nova tentativa em {:?}",
                        espera
                    );
                    tokio::time::sleep(espera).await;
                }
                Err(e) => {
                    error!(
                        target: "ledger_dead_letter",
                        locacao_id = evento.locacao_id(),
                        tentativas = self.tentativas,
                        evento = ?evento,
                        error = %e,
                        "❌ Evento financeiro descartado"
                    );
                }
            }
        }
        false
    }

    async fn aplicar_evento(&self, evento: &EventoFinanceiro) -> AppResult<()> {
        let mut tx = self.store.begin().await?;

        match evento {
            EventoFinanceiro::ReceitaRegistrada {
                locacao_id,
                cliente_id,
                valor,
                data,
            } => {
                let chave = ChaveMovimentacao::receita_locacao(*locacao_id);
                if tx.find_movimentacao(chave).await?.is_some() {
                    debug!(locacao_id, "Receita da locação já registrada");
                } else {
                    tx.insert_movimentacao(&NovaMovimentacao {
                        tipo: TipoMovimentacao::Entrada,
                        categoria: CATEGORIA_LOCACAO.to_string(),
                        descricao: descricao_receita_locacao(*locacao_id, false),
                        valor: *valor,
                        data_movimentacao: *data,
                        locacao_id: Some(*locacao_id),
                        cliente_id: Some(*cliente_id),
                        observacoes: None,
                    })
                    .await?;
                    info!(locacao_id, %valor, "💰 Receita da locação registrada");
                }
            }

            EventoFinanceiro::ValorTotalAlterado { locacao_id, valor } => {
                let chave = ChaveMovimentacao::receita_locacao(*locacao_id);
                match tx.find_movimentacao(chave).await? {
                    Some(mov) => {
                        tx.update_movimentacao_valor(
                            mov.id,
                            *valor,
                            &descricao_receita_locacao(*locacao_id, true),
                        )
                        .await?;
                        info!(locacao_id, %valor, "💰 Receita da locação atualizada");
                    }
                    None => {
                        debug!(locacao_id, "Sem movimentação de receita para atualizar");
                    }
                }
            }

            EventoFinanceiro::SeguroAlterado {
                locacao_id,
                cliente_id,
                valor,
                data_locacao,
            } => {
                let chave = ChaveMovimentacao::receita_seguro(*locacao_id);
                let existente = tx.find_movimentacao(chave).await?;

                match existente {
                    Some(mov) if valor.is_zero() => {
                        tx.delete_movimentacao(mov.id).await?;
                        info!(locacao_id, "🗑️ Movimentação de seguro removida");
                    }
                    Some(mov) => {
                        tx.update_movimentacao_valor(
                            mov.id,
                            *valor,
                            &descricao_receita_seguro(*locacao_id, true),
                        )
                        .await?;
                        info!(locacao_id, %valor, "🛡️ Seguro atualizado");
                    }
                    None if *valor > Decimal::ZERO => {
                        tx.insert_movimentacao(&NovaMovimentacao {
                            tipo: TipoMovimentacao::Entrada,
                            categoria: CATEGORIA_SEGURO.to_string(),
                            descricao: descricao_receita_seguro(*locacao_id, false),
                            valor: *valor,
                            data_movimentacao: *data_locacao,
                            locacao_id: Some(*locacao_id),
                            cliente_id: Some(*cliente_id),
                            observacoes: None,
                        })
                        .await?;
                        info!(locacao_id, %valor, "🛡️ Seguro registrado");
                    }
                    None => {}
                }
            }
        }

        tx.commit().await
    }
}
