//! Ciclo de vida das locações
//!
//! Criação, atualização, exclusão e expiração de locações. Cada operação
//! roda numa única transação que também mantém o status do veículo; os
//! lançamentos financeiros derivados são aplicados depois do commit pelo
//! [`ConciliadorFinanceiro`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};
use validator::ValidationErrors;

use super::conciliador_financeiro::{ConciliadorFinanceiro, EventoFinanceiro};
use crate::models::contrato::ContratoData;
use crate::models::locacao::{
    AtualizarLocacao, Locacao, LocacaoFiltro, LocacaoResumo, LocacaoStatus, NovaLocacao, Periodo,
};
use crate::models::veiculo::VeiculoStatus;
use crate::models::DbId;
use crate::repositories::{
    ClienteRepository, LocacaoRepository, MovimentacaoRepository, Store, StoreTx,
    VeiculoRepository, VistoriaRepository,
};
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{
    validate_non_negative_decimal, validate_periodo, validate_positive_decimal,
};

const MAX_OBSERVACOES: usize = 2000;

#[derive(Clone)]
pub struct LocacaoService<S: Store> {
    store: S,
    conciliador: ConciliadorFinanceiro<S>,
    receita_na_criacao: bool,
}

impl<S: Store> LocacaoService<S> {
    pub fn new(store: S, conciliador: ConciliadorFinanceiro<S>, receita_na_criacao: bool) -> Self {
        Self {
            store,
            conciliador,
            receita_na_criacao,
        }
    }

    pub async fn listar(&self, filtro: &LocacaoFiltro) -> AppResult<Vec<LocacaoResumo>> {
        let mut tx = self.store.begin().await?;
        let locacoes = tx.list_locacoes(filtro).await?;
        tx.commit().await?;
        Ok(locacoes)
    }

    pub async fn obter(&self, id: DbId) -> AppResult<Locacao> {
        let mut tx = self.store.begin().await?;
        let locacao = tx
            .find_locacao(id)
            .await?
            .ok_or_else(|| not_found_error("Locação", id))?;
        tx.commit().await?;
        Ok(locacao)
    }

    pub async fn criar(&self, nova: NovaLocacao) -> AppResult<Locacao> {
        validar(&CamposLocacao::from(&nova))?;

        let mut tx = self.store.begin().await?;

        if tx.find_cliente(nova.cliente_id).await?.is_none() {
            return Err(not_found_error("Cliente", nova.cliente_id));
        }

        exigir_veiculo_livre(&mut tx, nova.veiculo_id, nova.periodo(), None).await?;

        let locacao = tx.insert_locacao(&nova).await?;
        if locacao.status.is_ativa() {
            tx.set_veiculo_status(locacao.veiculo_id, VeiculoStatus::Locado)
                .await?;
        }

        tx.commit().await?;

        info!(
            locacao_id = locacao.id,
            veiculo_id = locacao.veiculo_id,
            cliente_id = locacao.cliente_id,
            "✅ Locação criada"
        );

        self.conciliar(self.eventos_criacao(&locacao)).await;
        Ok(locacao)
    }

    pub async fn atualizar(&self, id: DbId, patch: AtualizarLocacao) -> AppResult<Locacao> {
        let mut tx = self.store.begin().await?;

        let atual = tx
            .find_locacao_for_update(id)
            .await?
            .ok_or_else(|| not_found_error("Locação", id))?;

        if patch.is_empty() {
            return Err(bad_request_error("Nenhum campo válido para atualizar"));
        }

        let merged = atual.aplicar(&patch).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("valor_total", e);
            errors
        })?;
        validar(&CamposLocacao::from(&merged))?;

        if merged.cliente_id != atual.cliente_id
            && tx.find_cliente(merged.cliente_id).await?.is_none()
        {
            return Err(not_found_error("Cliente", merged.cliente_id));
        }
        if merged.veiculo_id != atual.veiculo_id
            && tx.find_veiculo(merged.veiculo_id).await?.is_none()
        {
            return Err(not_found_error("Veículo", merged.veiculo_id));
        }

        sincronizar_veiculo(&mut tx, &atual, &merged).await?;

        let salva = tx.update_locacao(&merged).await?;
        tx.commit().await?;

        info!(
            locacao_id = salva.id,
            status = ?salva.status,
            "✏️ Locação atualizada"
        );

        self.conciliar(eventos_atualizacao(&atual, &salva)).await;
        Ok(salva)
    }

    /// Exclui a locação com suas vistorias e movimentações e libera o veículo
    pub async fn excluir(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;

        let locacao = tx
            .find_locacao_for_update(id)
            .await?
            .ok_or_else(|| not_found_error("Locação", id))?;

        let vistorias = tx.delete_vistorias_da_locacao(id).await?;
        let movimentacoes = tx.delete_movimentacoes_da_locacao(id).await?;
        tx.delete_locacao(id).await?;
        liberar_veiculo(&mut tx, locacao.veiculo_id, id).await?;

        tx.commit().await?;

        info!(
            locacao_id = id,
            vistorias,
            movimentacoes,
            "🗑️ Locação excluída"
        );
        Ok(())
    }

    /// Finaliza as locações ativas com `data_entrega < hoje`
    pub async fn finalizar_expiradas(&self, hoje: NaiveDate) -> AppResult<Vec<DbId>> {
        let mut tx = self.store.begin().await?;

        let expiradas = tx.find_expiradas_for_update(hoje).await?;
        for locacao in &expiradas {
            let finalizada = Locacao {
                status: LocacaoStatus::Finalizada,
                ..locacao.clone()
            };
            tx.update_locacao(&finalizada).await?;
        }
        for locacao in &expiradas {
            liberar_veiculo(&mut tx, locacao.veiculo_id, locacao.id).await?;
        }

        tx.commit().await?;

        let ids: Vec<DbId> = expiradas.iter().map(|l| l.id).collect();
        if !ids.is_empty() {
            info!(total = ids.len(), ?ids, %hoje, "⏰ Locações expiradas finalizadas");
        }
        Ok(ids)
    }

    pub async fn contrato_data(&self, id: DbId, hoje: NaiveDate) -> AppResult<ContratoData> {
        let mut tx = self.store.begin().await?;

        let locacao = tx
            .find_locacao(id)
            .await?
            .ok_or_else(|| not_found_error("Locação", id))?;
        let cliente = tx
            .find_cliente(locacao.cliente_id)
            .await?
            .ok_or_else(|| not_found_error("Cliente", locacao.cliente_id))?;
        let veiculo = tx
            .find_veiculo(locacao.veiculo_id)
            .await?
            .ok_or_else(|| not_found_error("Veículo", locacao.veiculo_id))?;

        tx.commit().await?;
        Ok(ContratoData::montar(&locacao, &cliente, &veiculo, hoje))
    }

    fn eventos_criacao(&self, locacao: &Locacao) -> Vec<EventoFinanceiro> {
        let mut eventos = Vec::new();
        if self.receita_na_criacao {
            eventos.push(EventoFinanceiro::ReceitaRegistrada {
                locacao_id: locacao.id,
                cliente_id: locacao.cliente_id,
                valor: locacao.valor_total,
                data: locacao.data_locacao,
            });
        }
        if locacao.valor_seguro > Decimal::ZERO {
            eventos.push(EventoFinanceiro::SeguroAlterado {
                locacao_id: locacao.id,
                cliente_id: locacao.cliente_id,
                valor: locacao.valor_seguro,
                data_locacao: locacao.data_locacao,
            });
        }
        eventos
    }

    async fn conciliar(&self, eventos: Vec<EventoFinanceiro>) {
        if eventos.is_empty() {
            return;
        }
        let descartados = self.conciliador.aplicar(eventos).await;
        if !descartados.is_empty() {
            warn!(
                total = descartados.len(),
                "⚠️ Eventos financeiros não aplicados; conciliação manual necessária"
            );
        }
    }
}

fn eventos_atualizacao(antes: &Locacao, depois: &Locacao) -> Vec<EventoFinanceiro> {
    let mut eventos = Vec::new();
    if depois.valor_total != antes.valor_total {
        eventos.push(EventoFinanceiro::ValorTotalAlterado {
            locacao_id: depois.id,
            valor: depois.valor_total,
        });
    }
    if depois.valor_seguro != antes.valor_seguro {
        eventos.push(EventoFinanceiro::SeguroAlterado {
            locacao_id: depois.id,
            cliente_id: depois.cliente_id,
            valor: depois.valor_seguro,
            data_locacao: depois.data_locacao,
        });
    }
    eventos
}

async fn sincronizar_veiculo<T: StoreTx>(
    tx: &mut T,
    atual: &Locacao,
    merged: &Locacao,
) -> AppResult<()> {
    let trocou_veiculo = atual.veiculo_id != merged.veiculo_id;

    match (atual.status.is_ativa(), merged.status.is_ativa()) {
        (true, false) => liberar_veiculo(tx, atual.veiculo_id, atual.id).await,
        (false, true) => reservar_veiculo(tx, merged).await,
        (true, true) if trocou_veiculo => {
            reservar_veiculo(tx, merged).await?;
            liberar_veiculo(tx, atual.veiculo_id, atual.id).await
        }
        (true, true) if merged.periodo() != atual.periodo() => {
            verificar_sobreposicao(tx, merged.veiculo_id, merged.periodo(), Some(merged.id)).await
        }
        _ => Ok(()),
    }
}

/// Exige veículo disponível e período livre, e marca o veículo como locado
async fn reservar_veiculo<T: StoreTx>(tx: &mut T, locacao: &Locacao) -> AppResult<()> {
    exigir_veiculo_livre(tx, locacao.veiculo_id, locacao.periodo(), Some(locacao.id)).await?;
    tx.set_veiculo_status(locacao.veiculo_id, VeiculoStatus::Locado)
        .await?;
    Ok(())
}

/// Trava o veículo e confere o período antes do status: um pedido que
/// cruza uma locação ativa é `OverlapConflict` mesmo com o veículo locado.
/// Veículo inexistente é reportado como indisponível.
// Não inverter: no cenário do V101 (segunda locação no mesmo período com o
// veículo já locado) o cliente precisa ver OVERLAP_CONFLICT.
async fn exigir_veiculo_livre<T: StoreTx>(
    tx: &mut T,
    veiculo_id: DbId,
    periodo: Periodo,
    excluir: Option<DbId>,
) -> AppResult<()> {
    let veiculo = tx.find_veiculo_for_update(veiculo_id).await?;

    verificar_sobreposicao(tx, veiculo_id, periodo, excluir).await?;

    match veiculo {
        Some(veiculo) if veiculo.status == VeiculoStatus::Disponivel => Ok(()),
        _ => Err(AppError::VehicleUnavailable(
            "Veículo não está disponível para locação".to_string(),
        )),
    }
}

async fn verificar_sobreposicao<T: StoreTx>(
    tx: &mut T,
    veiculo_id: DbId,
    periodo: Periodo,
    excluir: Option<DbId>,
) -> AppResult<()> {
    if tx.exists_overlap(veiculo_id, periodo, excluir).await? {
        return Err(AppError::OverlapConflict(
            "Veículo já possui locação no período informado".to_string(),
        ));
    }
    Ok(())
}

/// Volta o veículo para `disponivel` se estiver `locado` e nenhuma outra
/// locação ativa o usar. Veículo `vendido` nunca é alterado.
async fn liberar_veiculo<T: StoreTx>(tx: &mut T, veiculo_id: DbId, locacao_id: DbId) -> AppResult<()> {
    let Some(veiculo) = tx.find_veiculo_for_update(veiculo_id).await? else {
        warn!(veiculo_id, locacao_id, "⚠️ Veículo não encontrado ao liberar");
        return Ok(());
    };

    if veiculo.status != VeiculoStatus::Locado {
        return Ok(());
    }

    if tx.count_ativas_do_veiculo(veiculo_id, Some(locacao_id)).await? > 0 {
        return Ok(());
    }

    tx.set_veiculo_status(veiculo_id, VeiculoStatus::Disponivel)
        .await?;
    info!(veiculo_id, locacao_id, "🚗 Veículo liberado");
    Ok(())
}

/// Campos validados tanto na criação quanto no resultado de uma atualização
struct CamposLocacao<'a> {
    cliente_id: DbId,
    veiculo_id: DbId,
    periodo: Periodo,
    valor_diaria: Decimal,
    valor_total: Decimal,
    valor_caucao: Decimal,
    valor_seguro: Decimal,
    observacoes: Option<&'a str>,
}

impl<'a> From<&'a NovaLocacao> for CamposLocacao<'a> {
    fn from(l: &'a NovaLocacao) -> Self {
        Self {
            cliente_id: l.cliente_id,
            veiculo_id: l.veiculo_id,
            periodo: l.periodo(),
            valor_diaria: l.valor_diaria,
            valor_total: l.valor_total,
            valor_caucao: l.valor_caucao,
            valor_seguro: l.valor_seguro,
            observacoes: l.observacoes.as_deref(),
        }
    }
}

impl<'a> From<&'a Locacao> for CamposLocacao<'a> {
    fn from(l: &'a Locacao) -> Self {
        Self {
            cliente_id: l.cliente_id,
            veiculo_id: l.veiculo_id,
            periodo: l.periodo(),
            valor_diaria: l.valor_diaria,
            valor_total: l.valor_total,
            valor_caucao: l.valor_caucao,
            valor_seguro: l.valor_seguro,
            observacoes: l.observacoes.as_deref(),
        }
    }
}

fn validar(campos: &CamposLocacao<'_>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if campos.cliente_id <= 0 {
        errors.add("cliente_id", validator::ValidationError::new("range"));
    }
    if campos.veiculo_id <= 0 {
        errors.add("veiculo_id", validator::ValidationError::new("range"));
    }
    if let Err(e) = validate_periodo(campos.periodo.inicio, campos.periodo.fim) {
        errors.add("data_entrega", e);
    }
    if let Err(e) = validate_positive_decimal(&campos.valor_diaria) {
        errors.add("valor_diaria", e);
    }
    if let Err(e) = validate_positive_decimal(&campos.valor_total) {
        errors.add("valor_total", e);
    }
    if let Err(e) = validate_non_negative_decimal(&campos.valor_caucao) {
        errors.add("valor_caucao", e);
    }
    if let Err(e) = validate_non_negative_decimal(&campos.valor_seguro) {
        errors.add("valor_seguro", e);
    }
    if campos
        .observacoes
        .map_or(false, |o| o.chars().count() > MAX_OBSERVACOES)
    {
        errors.add("observacoes", validator::ValidationError::new("length"));
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn locacao(valor_total: i64, valor_seguro: i64) -> Locacao {
        Locacao {
            id: 9,
            cliente_id: 1,
            veiculo_id: 101,
            data_locacao: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            data_entrega: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            valor_diaria: Decimal::new(100, 0),
            valor_total: Decimal::new(valor_total, 0),
            valor_caucao: Decimal::ZERO,
            valor_seguro: Decimal::new(valor_seguro, 0),
            status: LocacaoStatus::Ativa,
            observacoes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_eventos_so_quando_valor_muda() {
        assert!(eventos_atualizacao(&locacao(900, 50), &locacao(900, 50)).is_empty());

        let eventos = eventos_atualizacao(&locacao(900, 50), &locacao(1000, 0));
        assert_eq!(eventos.len(), 2);
        assert!(matches!(
            eventos[0],
            EventoFinanceiro::ValorTotalAlterado { locacao_id: 9, .. }
        ));
        assert!(matches!(
            eventos[1],
            EventoFinanceiro::SeguroAlterado { valor, .. } if valor.is_zero()
        ));
    }

    #[test]
    fn test_validar_rejeita_merge_invalido() {
        let mut l = locacao(900, 0);
        assert!(validar(&CamposLocacao::from(&l)).is_ok());

        l.data_entrega = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        l.valor_caucao = Decimal::new(-1, 0);
        let errors = validar(&CamposLocacao::from(&l)).unwrap_err();
        let campos = errors.field_errors();
        assert!(campos.contains_key("data_entrega"));
        assert!(campos.contains_key("valor_caucao"));
    }
}
