//! Store em memória
//!
//! Implementa os mesmos traits do `PgStore` sobre coleções em memória.
//! Uma transação segura o mutex do estado inteiro e trabalha sobre uma
//! cópia; `commit` grava a cópia de volta e descartar a transação desfaz.
//! Também reproduz a constraint de exclusão `locacoes_sem_sobreposicao`
//! e permite injetar falhas nas escritas do livro-caixa e de vistorias.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    ClienteRepository, LocacaoRepository, MovimentacaoRepository, Store, StoreTx,
    VeiculoRepository, VistoriaRepository,
};
use crate::models::cliente::Cliente;
use crate::models::locacao::{
    Locacao, LocacaoFiltro, LocacaoResumo, LocacaoStatus, NovaLocacao, Periodo,
};
use crate::models::movimentacao::{ChaveMovimentacao, MovimentacaoFinanceira, NovaMovimentacao};
use crate::models::veiculo::{Veiculo, VeiculoStatus};
use crate::models::vistoria::{NovaVistoria, Vistoria, VistoriaFiltro};
use crate::models::DbId;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub clientes: BTreeMap<DbId, Cliente>,
    pub veiculos: BTreeMap<DbId, Veiculo>,
    pub locacoes: BTreeMap<DbId, Locacao>,
    pub movimentacoes: BTreeMap<DbId, MovimentacaoFinanceira>,
    pub vistorias: BTreeMap<DbId, Vistoria>,
    sequencia: DbId,
}

impl MemoryState {
    fn proximo_id(&mut self) -> DbId {
        self.sequencia += 1;
        self.sequencia
    }

    fn reservar_id(&mut self, id: DbId) {
        self.sequencia = self.sequencia.max(id);
    }

    pub fn movimentacoes_da_locacao(&self, locacao_id: DbId) -> Vec<&MovimentacaoFinanceira> {
        self.movimentacoes
            .values()
            .filter(|m| m.locacao_id == Some(locacao_id))
            .collect()
    }

    pub fn vistorias_da_locacao(&self, locacao_id: DbId) -> Vec<&Vistoria> {
        self.vistorias
            .values()
            .filter(|v| v.locacao_id == Some(locacao_id))
            .collect()
    }

    /// Equivalente à constraint de exclusão do banco
    fn verificar_exclusao(&self, candidata: &Locacao) -> AppResult<()> {
        if !candidata.status.is_ativa() {
            return Ok(());
        }
        let conflito = self.locacoes.values().any(|l| {
            l.id != candidata.id
                && l.veiculo_id == candidata.veiculo_id
                && l.status.is_ativa()
                && l.periodo().sobrepoe(&candidata.periodo())
        });
        if conflito {
            return Err(AppError::OverlapConflict(
                "Veículo já possui locação no período informado".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FalhasInjetadas {
    movimentacoes: AtomicUsize,
    vistorias: AtomicUsize,
}

fn consumir_falha(contador: &AtomicUsize, operacao: &str) -> AppResult<()> {
    let restante = contador.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    match restante {
        Ok(_) => Err(AppError::Persistence(sqlx::Error::Protocol(format!(
            "falha injetada em {}",
            operacao
        )))),
        Err(_) => Ok(()),
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    falhas: Arc<FalhasInjetadas>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_cliente(&self, id: DbId, nome: &str) -> Cliente {
        let agora = Utc::now();
        let cliente = Cliente {
            id,
            nome: nome.to_string(),
            cpf: format!("000.000.000-{:02}", id % 100),
            celular: "(11) 90000-0000".to_string(),
            email: format!("cliente{}@locadora.test", id),
            endereco: "Rua Principal, 100".to_string(),
            bairro: Some("Centro".to_string()),
            cidade: Some("São Paulo".to_string()),
            estado: Some("SP".to_string()),
            cep: Some("01000-000".to_string()),
            created_at: agora,
            updated_at: agora,
        };
        let mut state = self.state.lock().await;
        state.reservar_id(id);
        state.clientes.insert(id, cliente.clone());
        cliente
    }

    pub async fn seed_veiculo(
        &self,
        id: DbId,
        marca: &str,
        modelo: &str,
        placa: &str,
        status: VeiculoStatus,
    ) -> Veiculo {
        let agora = Utc::now();
        let veiculo = Veiculo {
            id,
            marca: marca.to_string(),
            modelo: modelo.to_string(),
            ano: 2023,
            placa: placa.to_string(),
            cor: Some("Branco".to_string()),
            valor_diaria: Some(Decimal::new(100, 0)),
            valor_veiculo: Decimal::new(75_000, 0),
            status,
            created_at: agora,
            updated_at: agora,
        };
        let mut state = self.state.lock().await;
        state.reservar_id(id);
        state.veiculos.insert(id, veiculo.clone());
        veiculo
    }

    /// Cópia do estado confirmado
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    /// As próximas `n` escritas no livro-caixa falham
    pub fn falhar_movimentacoes(&self, n: usize) {
        self.falhas.movimentacoes.store(n, Ordering::SeqCst);
    }

    /// As próximas `n` inserções de vistoria falham
    pub fn falhar_vistorias(&self, n: usize) {
        self.falhas.vistorias.store(n, Ordering::SeqCst);
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    falhas: Arc<FalhasInjetadas>,
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> AppResult<MemoryTx> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            falhas: self.falhas.clone(),
        })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self) -> AppResult<()> {
        let MemoryTx {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl ClienteRepository for MemoryTx {
    async fn find_cliente(&mut self, id: DbId) -> AppResult<Option<Cliente>> {
        Ok(self.working.clientes.get(&id).cloned())
    }
}

#[async_trait]
impl VeiculoRepository for MemoryTx {
    async fn find_veiculo(&mut self, id: DbId) -> AppResult<Option<Veiculo>> {
        Ok(self.working.veiculos.get(&id).cloned())
    }

    async fn find_veiculo_for_update(&mut self, id: DbId) -> AppResult<Option<Veiculo>> {
        Ok(self.working.veiculos.get(&id).cloned())
    }

    async fn set_veiculo_status(&mut self, id: DbId, status: VeiculoStatus) -> AppResult<bool> {
        match self.working.veiculos.get_mut(&id) {
            Some(veiculo) => {
                veiculo.status = status;
                veiculo.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl LocacaoRepository for MemoryTx {
    async fn insert_locacao(&mut self, nova: &NovaLocacao) -> AppResult<Locacao> {
        let agora = Utc::now();
        let locacao = Locacao {
            id: 0,
            cliente_id: nova.cliente_id,
            veiculo_id: nova.veiculo_id,
            data_locacao: nova.data_locacao,
            data_entrega: nova.data_entrega,
            valor_diaria: nova.valor_diaria,
            valor_total: nova.valor_total,
            valor_caucao: nova.valor_caucao,
            valor_seguro: nova.valor_seguro,
            status: nova.status,
            observacoes: nova.observacoes.clone(),
            created_at: agora,
            updated_at: agora,
        };
        self.working.verificar_exclusao(&locacao)?;

        let id = self.working.proximo_id();
        let locacao = Locacao { id, ..locacao };
        self.working.locacoes.insert(id, locacao.clone());
        Ok(locacao)
    }

    async fn find_locacao(&mut self, id: DbId) -> AppResult<Option<Locacao>> {
        Ok(self.working.locacoes.get(&id).cloned())
    }

    async fn find_locacao_for_update(&mut self, id: DbId) -> AppResult<Option<Locacao>> {
        Ok(self.working.locacoes.get(&id).cloned())
    }

    async fn update_locacao(&mut self, locacao: &Locacao) -> AppResult<Locacao> {
        if !self.working.locacoes.contains_key(&locacao.id) {
            return Err(AppError::Persistence(sqlx::Error::RowNotFound));
        }
        self.working.verificar_exclusao(locacao)?;

        let atualizada = Locacao {
            updated_at: Utc::now(),
            ..locacao.clone()
        };
        self.working.locacoes.insert(atualizada.id, atualizada.clone());
        Ok(atualizada)
    }

    async fn delete_locacao(&mut self, id: DbId) -> AppResult<bool> {
        Ok(self.working.locacoes.remove(&id).is_some())
    }

    async fn exists_overlap(
        &mut self,
        veiculo_id: DbId,
        periodo: Periodo,
        excluir: Option<DbId>,
    ) -> AppResult<bool> {
        Ok(self.working.locacoes.values().any(|l| {
            l.veiculo_id == veiculo_id
                && l.status.is_ativa()
                && Some(l.id) != excluir
                && l.periodo().sobrepoe(&periodo)
        }))
    }

    async fn count_ativas_do_veiculo(
        &mut self,
        veiculo_id: DbId,
        excluir: Option<DbId>,
    ) -> AppResult<i64> {
        let total = self
            .working
            .locacoes
            .values()
            .filter(|l| l.veiculo_id == veiculo_id && l.status.is_ativa() && Some(l.id) != excluir)
            .count();
        Ok(total as i64)
    }

    async fn list_locacoes(&mut self, filtro: &LocacaoFiltro) -> AppResult<Vec<LocacaoResumo>> {
        let termo = filtro.termo();
        let mut resultado: Vec<LocacaoResumo> = self
            .working
            .locacoes
            .values()
            .filter(|l| filtro.status.map_or(true, |s| l.status == s))
            .filter_map(|l| {
                let cliente = self.working.clientes.get(&l.cliente_id)?;
                let veiculo = self.working.veiculos.get(&l.veiculo_id)?;
                if let Some(termo) = &termo {
                    let encontrado = [&cliente.nome, &veiculo.marca, &veiculo.modelo, &veiculo.placa]
                        .iter()
                        .any(|campo| campo.to_lowercase().contains(termo.as_str()));
                    if !encontrado {
                        return None;
                    }
                }
                Some(LocacaoResumo {
                    locacao: l.clone(),
                    cliente_nome: cliente.nome.clone(),
                    veiculo_info: veiculo.descricao(),
                })
            })
            .collect();

        resultado.sort_by(|a, b| {
            (b.locacao.created_at, b.locacao.id).cmp(&(a.locacao.created_at, a.locacao.id))
        });
        Ok(resultado)
    }

    async fn find_expiradas_for_update(&mut self, hoje: NaiveDate) -> AppResult<Vec<Locacao>> {
        let mut expiradas: Vec<Locacao> = self
            .working
            .locacoes
            .values()
            .filter(|l| l.status == LocacaoStatus::Ativa && l.data_entrega < hoje)
            .cloned()
            .collect();
        expiradas.sort_by_key(|l| (l.data_entrega, l.id));
        Ok(expiradas)
    }
}

#[async_trait]
impl MovimentacaoRepository for MemoryTx {
    async fn find_movimentacao(
        &mut self,
        chave: ChaveMovimentacao,
    ) -> AppResult<Option<MovimentacaoFinanceira>> {
        Ok(self
            .working
            .movimentacoes
            .values()
            .find(|m| chave.corresponde(m))
            .cloned())
    }

    async fn find_movimentacao_by_id(
        &mut self,
        id: DbId,
    ) -> AppResult<Option<MovimentacaoFinanceira>> {
        Ok(self.working.movimentacoes.get(&id).cloned())
    }

    async fn insert_movimentacao(
        &mut self,
        nova: &NovaMovimentacao,
    ) -> AppResult<MovimentacaoFinanceira> {
        consumir_falha(&self.falhas.movimentacoes, "insert_movimentacao")?;

        let id = self.working.proximo_id();
        let movimentacao = MovimentacaoFinanceira {
            id,
            tipo: nova.tipo,
            categoria: nova.categoria.clone(),
            descricao: nova.descricao.clone(),
            valor: nova.valor,
            data_movimentacao: nova.data_movimentacao,
            locacao_id: nova.locacao_id,
            cliente_id: nova.cliente_id,
            observacoes: nova.observacoes.clone(),
            created_at: Utc::now(),
        };
        self.working.movimentacoes.insert(id, movimentacao.clone());
        Ok(movimentacao)
    }

    async fn update_movimentacao_valor(
        &mut self,
        id: DbId,
        valor: Decimal,
        descricao: &str,
    ) -> AppResult<()> {
        consumir_falha(&self.falhas.movimentacoes, "update_movimentacao_valor")?;

        if let Some(movimentacao) = self.working.movimentacoes.get_mut(&id) {
            movimentacao.valor = valor;
            movimentacao.descricao = descricao.to_string();
        }
        Ok(())
    }

    async fn update_movimentacao(
        &mut self,
        movimentacao: &MovimentacaoFinanceira,
    ) -> AppResult<MovimentacaoFinanceira> {
        consumir_falha(&self.falhas.movimentacoes, "update_movimentacao")?;

        match self.working.movimentacoes.get_mut(&movimentacao.id) {
            Some(atual) => {
                *atual = movimentacao.clone();
                Ok(atual.clone())
            }
            None => Err(AppError::Persistence(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_movimentacao(&mut self, id: DbId) -> AppResult<()> {
        consumir_falha(&self.falhas.movimentacoes, "delete_movimentacao")?;

        self.working.movimentacoes.remove(&id);
        Ok(())
    }

    async fn delete_movimentacoes_da_locacao(&mut self, locacao_id: DbId) -> AppResult<u64> {
        consumir_falha(&self.falhas.movimentacoes, "delete_movimentacoes_da_locacao")?;

        let antes = self.working.movimentacoes.len();
        self.working
            .movimentacoes
            .retain(|_, m| m.locacao_id != Some(locacao_id));
        Ok((antes - self.working.movimentacoes.len()) as u64)
    }

    async fn list_movimentacoes(
        &mut self,
        locacao_id: Option<DbId>,
    ) -> AppResult<Vec<MovimentacaoFinanceira>> {
        let mut movimentacoes: Vec<MovimentacaoFinanceira> = self
            .working
            .movimentacoes
            .values()
            .filter(|m| locacao_id.map_or(true, |id| m.locacao_id == Some(id)))
            .cloned()
            .collect();
        movimentacoes.sort_by(|a, b| {
            (b.data_movimentacao, b.id).cmp(&(a.data_movimentacao, a.id))
        });
        Ok(movimentacoes)
    }
}

#[async_trait]
impl VistoriaRepository for MemoryTx {
    async fn insert_vistoria(&mut self, nova: &NovaVistoria) -> AppResult<Vistoria> {
        consumir_falha(&self.falhas.vistorias, "insert_vistoria")?;

        let id = self.working.proximo_id();
        let agora = Utc::now();
        let vistoria = Vistoria {
            id,
            locacao_id: nova.locacao_id,
            veiculo_id: nova.veiculo_id,
            cliente_id: nova.cliente_id,
            tipo_vistoria: nova.tipo_vistoria,
            data_vistoria: nova.data_vistoria,
            placa: nova.placa.clone(),
            modelo: nova.modelo.clone(),
            cor: nova.cor.clone(),
            nome_condutor: nova.nome_condutor.clone(),
            rg_condutor: nova.rg_condutor.clone(),
            telefone_condutor: nova.telefone_condutor.clone(),
            quilometragem: nova.quilometragem,
            nivel_combustivel: nova.nivel_combustivel.clone(),
            observacoes: nova.observacoes.clone(),
            avarias: Json(nova.avarias.clone()),
            fotos: Json(nova.fotos.clone()),
            checklist: nova.checklist.clone(),
            assinatura_cliente: nova.assinatura_cliente.clone(),
            assinatura_vistoriador: nova.assinatura_vistoriador.clone(),
            nome_vistoriador: nova.nome_vistoriador.clone(),
            created_at: agora,
            updated_at: agora,
        };
        self.working.vistorias.insert(id, vistoria.clone());
        Ok(vistoria)
    }

    async fn find_vistoria(&mut self, id: DbId) -> AppResult<Option<Vistoria>> {
        Ok(self.working.vistorias.get(&id).cloned())
    }

    async fn update_vistoria(&mut self, vistoria: &Vistoria) -> AppResult<Vistoria> {
        if !self.working.vistorias.contains_key(&vistoria.id) {
            return Err(AppError::Persistence(sqlx::Error::RowNotFound));
        }
        self.working.vistorias.insert(vistoria.id, vistoria.clone());
        Ok(vistoria.clone())
    }

    async fn delete_vistoria(&mut self, id: DbId) -> AppResult<bool> {
        Ok(self.working.vistorias.remove(&id).is_some())
    }

    async fn delete_vistorias_da_locacao(&mut self, locacao_id: DbId) -> AppResult<u64> {
        let antes = self.working.vistorias.len();
        self.working
            .vistorias
            .retain(|_, v| v.locacao_id != Some(locacao_id));
        Ok((antes - self.working.vistorias.len()) as u64)
    }

    async fn list_vistorias(&mut self, filtro: &VistoriaFiltro) -> AppResult<Vec<Vistoria>> {
        let mut vistorias: Vec<Vistoria> = self
            .working
            .vistorias
            .values()
            .filter(|v| filtro.aceita(v))
            .cloned()
            .collect();
        vistorias.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(vistorias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nova_locacao(veiculo_id: DbId, inicio: u32, fim: u32) -> NovaLocacao {
        NovaLocacao {
            cliente_id: 1,
            veiculo_id,
            data_locacao: NaiveDate::from_ymd_opt(2025, 3, inicio).unwrap(),
            data_entrega: NaiveDate::from_ymd_opt(2025, 3, fim).unwrap(),
            valor_diaria: Decimal::new(100, 0),
            valor_total: Decimal::new(500, 0),
            valor_caucao: Decimal::ZERO,
            valor_seguro: Decimal::ZERO,
            status: LocacaoStatus::Ativa,
            observacoes: None,
        }
    }

    #[tokio::test]
    async fn test_transacao_descartada_nao_grava() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_locacao(&nova_locacao(101, 1, 5)).await.unwrap();
        }
        assert!(store.snapshot().await.locacoes.is_empty());

        let mut tx = store.begin().await.unwrap();
        tx.insert_locacao(&nova_locacao(101, 1, 5)).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.snapshot().await.locacoes.len(), 1);
    }

    #[tokio::test]
    async fn test_constraint_de_exclusao() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_locacao(&nova_locacao(101, 1, 10)).await.unwrap();
        let err = tx.insert_locacao(&nova_locacao(101, 10, 15)).await.unwrap_err();
        assert!(matches!(err, AppError::OverlapConflict(_)));
        tx.insert_locacao(&nova_locacao(202, 10, 15)).await.unwrap();
    }

    #[tokio::test]
    async fn test_falha_injetada_consumida_uma_vez() {
        let store = MemoryStore::new();
        store.falhar_movimentacoes(1);
        let mut tx = store.begin().await.unwrap();
        assert!(tx.delete_movimentacoes_da_locacao(1).await.is_err());
        assert!(tx.delete_movimentacoes_da_locacao(1).await.is_ok());
    }
}
