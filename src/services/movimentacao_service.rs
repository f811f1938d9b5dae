//! Movimentações lançadas à mão
//!
//! Despesas e receitas avulsas (com ou sem locação). As receitas de
//! locação e de seguro vinculadas a uma locação são do
//! [`ConciliadorFinanceiro`](super::ConciliadorFinanceiro) e não podem ser
//! criadas nem reclassificadas por aqui.

use tracing::info;

use crate::models::movimentacao::{
    is_lancamento_automatico, AtualizarMovimentacao, MovimentacaoFinanceira, NovaMovimentacao,
};
use crate::models::DbId;
use crate::repositories::{LocacaoRepository, MovimentacaoRepository, Store, StoreTx};
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

const LANCAMENTO_AUTOMATICO: &str =
    "Receitas de locação e de seguro são lançadas automaticamente pela locação";

#[derive(Clone)]
pub struct MovimentacaoService<S: Store> {
    store: S,
}

impl<S: Store> MovimentacaoService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn listar(&self, locacao_id: Option<DbId>) -> AppResult<Vec<MovimentacaoFinanceira>> {
        let mut tx = self.store.begin().await?;
        let movimentacoes = tx.list_movimentacoes(locacao_id).await?;
        tx.commit().await?;
        Ok(movimentacoes)
    }

    pub async fn obter(&self, id: DbId) -> AppResult<MovimentacaoFinanceira> {
        let mut tx = self.store.begin().await?;
        let movimentacao = tx
            .find_movimentacao_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Movimentação", id))?;
        tx.commit().await?;
        Ok(movimentacao)
    }

    pub async fn criar(&self, nova: NovaMovimentacao) -> AppResult<MovimentacaoFinanceira> {
        let mut tx = self.store.begin().await?;

        if let Some(locacao_id) = nova.locacao_id {
            if is_lancamento_automatico(nova.tipo, &nova.categoria) {
                return Err(bad_request_error(LANCAMENTO_AUTOMATICO));
            }
            if tx.find_locacao(locacao_id).await?.is_none() {
                return Err(not_found_error("Locação", locacao_id));
            }
        }
        if let Some(cliente_id) = nova.cliente_id {
            verificar_cliente(&mut tx, cliente_id).await?;
        }

        let movimentacao = tx.insert_movimentacao(&nova).await?;
        tx.commit().await?;

        info!(
            movimentacao_id = movimentacao.id,
            tipo = ?movimentacao.tipo,
            categoria = %movimentacao.categoria,
            valor = %movimentacao.valor,
            "💰 Movimentação registrada"
        );
        Ok(movimentacao)
    }

    pub async fn atualizar(
        &self,
        id: DbId,
        patch: AtualizarMovimentacao,
    ) -> AppResult<MovimentacaoFinanceira> {
        let mut tx = self.store.begin().await?;

        let atual = tx
            .find_movimentacao_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Movimentação", id))?;

        if patch.is_empty() {
            return Err(bad_request_error("Nenhum campo válido para atualizar"));
        }

        let merged = atual.aplicar(&patch);

        // Vinculada a uma locação, a classificação é a chave do conciliador
        let reclassificou = merged.tipo != atual.tipo || merged.categoria != atual.categoria;
        if atual.locacao_id.is_some() && reclassificou {
            return Err(bad_request_error(
                "Tipo e categoria de movimentação vinculada a locação não podem mudar",
            ));
        }
        if merged.cliente_id != atual.cliente_id {
            if let Some(cliente_id) = merged.cliente_id {
                verificar_cliente(&mut tx, cliente_id).await?;
            }
        }

        let salva = tx.update_movimentacao(&merged).await?;
        tx.commit().await?;

        info!(movimentacao_id = salva.id, valor = %salva.valor, "✏️ Movimentação atualizada");
        Ok(salva)
    }

    pub async fn excluir(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if tx.find_movimentacao_by_id(id).await?.is_none() {
            return Err(not_found_error("Movimentação", id));
        }
        tx.delete_movimentacao(id).await?;
        tx.commit().await?;

        info!(movimentacao_id = id, "🗑️ Movimentação excluída");
        Ok(())
    }
}

async fn verificar_cliente<T: StoreTx>(tx: &mut T, cliente_id: DbId) -> AppResult<()> {
    if tx.find_cliente(cliente_id).await?.is_none() {
        return Err(not_found_error("Cliente", cliente_id));
    }
    Ok(())
}
