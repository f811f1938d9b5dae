//! Repositórios
//!
//! Cada operação do ciclo de vida roda dentro de uma única transação:
//! o serviço abre um `StoreTx` com [`Store::begin`], usa os repositórios
//! através dele e confirma com [`StoreTx::commit`]. Descartar o `StoreTx`
//! sem `commit` desfaz tudo.
//!
//! Há duas implementações: [`PgStore`] (PostgreSQL via SQLx) e
//! `memory::MemoryStore` (em memória, só nos testes ou com a feature
//! `test-support`).

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::cliente::Cliente;
use crate::models::locacao::{Locacao, LocacaoFiltro, LocacaoResumo, NovaLocacao, Periodo};
use crate::models::movimentacao::{ChaveMovimentacao, MovimentacaoFinanceira, NovaMovimentacao};
use crate::models::veiculo::{Veiculo, VeiculoStatus};
use crate::models::vistoria::{NovaVistoria, Vistoria, VistoriaFiltro};
use crate::models::DbId;
use crate::utils::errors::AppResult;

pub mod cliente_repository;
pub mod locacao_repository;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod movimentacao_repository;
pub mod veiculo_repository;
pub mod vistoria_repository;

#[async_trait]
pub trait ClienteRepository {
    async fn find_cliente(&mut self, id: DbId) -> AppResult<Option<Cliente>>;
}

#[async_trait]
pub trait VeiculoRepository {
    async fn find_veiculo(&mut self, id: DbId) -> AppResult<Option<Veiculo>>;

    /// Lê o veículo travando a linha até o fim da transação
    async fn find_veiculo_for_update(&mut self, id: DbId) -> AppResult<Option<Veiculo>>;

    /// Retorna `false` se o veículo não existe
    async fn set_veiculo_status(&mut self, id: DbId, status: VeiculoStatus) -> AppResult<bool>;
}

#[async_trait]
pub trait LocacaoRepository {
    async fn insert_locacao(&mut self, nova: &NovaLocacao) -> AppResult<Locacao>;
    async fn find_locacao(&mut self, id: DbId) -> AppResult<Option<Locacao>>;
    async fn find_locacao_for_update(&mut self, id: DbId) -> AppResult<Option<Locacao>>;
    async fn update_locacao(&mut self, locacao: &Locacao) -> AppResult<Locacao>;
    async fn delete_locacao(&mut self, id: DbId) -> AppResult<bool>;

    /// Existe locação `ativa` do veículo cujo período cruza `periodo`?
    async fn exists_overlap(
        &mut self,
        veiculo_id: DbId,
        periodo: Periodo,
        excluir: Option<DbId>,
    ) -> AppResult<bool>;

    async fn count_ativas_do_veiculo(
        &mut self,
        veiculo_id: DbId,
        excluir: Option<DbId>,
    ) -> AppResult<i64>;

    async fn list_locacoes(&mut self, filtro: &LocacaoFiltro) -> AppResult<Vec<LocacaoResumo>>;

    /// Locações `ativa` com `data_entrega < hoje`, travadas
    async fn find_expiradas_for_update(&mut self, hoje: NaiveDate) -> AppResult<Vec<Locacao>>;
}

#[async_trait]
pub trait MovimentacaoRepository {
    async fn find_movimentacao(
        &mut self,
        chave: ChaveMovimentacao,
    ) -> AppResult<Option<MovimentacaoFinanceira>>;
    async fn find_movimentacao_by_id(&mut self, id: DbId)
        -> AppResult<Option<MovimentacaoFinanceira>>;
    async fn insert_movimentacao(&mut self, nova: &NovaMovimentacao)
        -> AppResult<MovimentacaoFinanceira>;
    async fn update_movimentacao_valor(
        &mut self,
        id: DbId,
        valor: Decimal,
        descricao: &str,
    ) -> AppResult<()>;
    async fn update_movimentacao(
        &mut self,
        movimentacao: &MovimentacaoFinanceira,
    ) -> AppResult<MovimentacaoFinanceira>;
    async fn delete_movimentacao(&mut self, id: DbId) -> AppResult<()>;
    async fn delete_movimentacoes_da_locacao(&mut self, locacao_id: DbId) -> AppResult<u64>;
    async fn list_movimentacoes(
        &mut self,
        locacao_id: Option<DbId>,
    ) -> AppResult<Vec<MovimentacaoFinanceira>>;
}

#[async_trait]
pub trait VistoriaRepository {
    async fn insert_vistoria(&mut self, nova: &NovaVistoria) -> AppResult<Vistoria>;
    async fn find_vistoria(&mut self, id: DbId) -> AppResult<Option<Vistoria>>;
    async fn update_vistoria(&mut self, vistoria: &Vistoria) -> AppResult<Vistoria>;
    async fn delete_vistoria(&mut self, id: DbId) -> AppResult<bool>;
    async fn delete_vistorias_da_locacao(&mut self, locacao_id: DbId) -> AppResult<u64>;
    async fn list_vistorias(&mut self, filtro: &VistoriaFiltro) -> AppResult<Vec<Vistoria>>;
}

/// Transação aberta sobre todos os repositórios
#[async_trait]
pub trait StoreTx:
    ClienteRepository
    + VeiculoRepository
    + LocacaoRepository
    + MovimentacaoRepository
    + VistoriaRepository
    + Send
{
    async fn commit(self) -> AppResult<()>;
}

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> AppResult<Self::Tx>;

    /// Verificação de saúde do armazenamento
    async fn ping(&self) -> AppResult<()>;
}

/// Store PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> AppResult<PgTx> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx })
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
