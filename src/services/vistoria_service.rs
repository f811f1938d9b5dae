//! Vistorias e a passagem saída → entrada pendente
//!
//! Quando uma vistoria de saída recebe um vistoriador real (na criação ou
//! numa atualização que substitui o sentinela "Sistema"), é gerada uma
//! vistoria de entrada pendente copiada dela. A geração é best-effort:
//! uma falha é registrada em log e não afeta a requisição.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::vistoria::{AtualizarVistoria, NovaVistoria, TipoVistoria, Vistoria, VistoriaFiltro};
use crate::models::DbId;
use crate::repositories::{
    ClienteRepository, Store, StoreTx, VeiculoRepository, VistoriaRepository,
};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct VistoriaService<S: Store> {
    store: S,
}

impl<S: Store> VistoriaService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn listar(&self, filtro: &VistoriaFiltro) -> AppResult<Vec<Vistoria>> {
        let mut tx = self.store.begin().await?;
        let vistorias = tx.list_vistorias(filtro).await?;
        tx.commit().await?;
        Ok(vistorias)
    }

    pub async fn obter(&self, id: DbId) -> AppResult<Vistoria> {
        let mut tx = self.store.begin().await?;
        let vistoria = tx
            .find_vistoria(id)
            .await?
            .ok_or_else(|| not_found_error("Vistoria", id))?;
        tx.commit().await?;
        Ok(vistoria)
    }

    pub async fn criar(&self, nova: NovaVistoria) -> AppResult<Vistoria> {
        let mut tx = self.store.begin().await?;

        if tx.find_cliente(nova.cliente_id).await?.is_none() {
            return Err(not_found_error("Cliente", nova.cliente_id));
        }
        if tx.find_veiculo(nova.veiculo_id).await?.is_none() {
            return Err(not_found_error("Veículo", nova.veiculo_id));
        }
        if let Some(locacao_id) = nova.locacao_id {
            verificar_locacao(&mut tx, locacao_id).await?;
        }

        let vistoria = tx.insert_vistoria(&nova).await?;
        tx.commit().await?;

        info!(
            vistoria_id = vistoria.id,
            locacao_id = ?vistoria.locacao_id,
            tipo = ?vistoria.tipo_vistoria,
            "📋 Vistoria registrada"
        );

        if vistoria.tipo_vistoria == TipoVistoria::Saida && !vistoria.is_pendente() {
            self.gerar_entrada_pendente(&vistoria).await;
        }
        Ok(vistoria)
    }

    pub async fn atualizar(&self, id: DbId, patch: AtualizarVistoria) -> AppResult<Vistoria> {
        let mut tx = self.store.begin().await?;

        let atual = tx
            .find_vistoria(id)
            .await?
            .ok_or_else(|| not_found_error("Vistoria", id))?;

        let merged = atual.aplicar(&patch, Utc::now());
        if merged.locacao_id != atual.locacao_id {
            if let Some(locacao_id) = merged.locacao_id {
                verificar_locacao(&mut tx, locacao_id).await?;
            }
        }

        let salva = tx.update_vistoria(&merged).await?;
        tx.commit().await?;

        info!(vistoria_id = salva.id, "📋 Vistoria atualizada");

        let concluiu_saida = salva.tipo_vistoria == TipoVistoria::Saida
            && atual.is_pendente()
            && !salva.is_pendente();
        if concluiu_saida {
            self.gerar_entrada_pendente(&salva).await;
        }
        Ok(salva)
    }

    pub async fn excluir(&self, id: DbId) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_vistoria(id).await? {
            return Err(not_found_error("Vistoria", id));
        }
        tx.commit().await?;

        info!(vistoria_id = id, "🗑️ Vistoria excluída");
        Ok(())
    }

    /// Gera no máximo uma entrada pendente por saída: se já houver uma
    /// pendente para a mesma locação, veículo e cliente, nada é inserido.
    async fn gerar_entrada_pendente(&self, saida: &Vistoria) -> Option<Vistoria> {
        let resultado = async {
            let mut tx = self.store.begin().await?;

            let filtro = VistoriaFiltro {
                locacao_id: saida.locacao_id,
                veiculo_id: Some(saida.veiculo_id),
                cliente_id: Some(saida.cliente_id),
                tipo_vistoria: Some(TipoVistoria::Entrada),
                pendentes: true,
            };
            let ja_existe = tx
                .list_vistorias(&filtro)
                .await?
                .iter()
                .any(|v| v.locacao_id == saida.locacao_id);
            if ja_existe {
                return AppResult::Ok(None);
            }

            let entrada = tx.insert_vistoria(&saida.entrada_pendente(Utc::now())).await?;
            tx.commit().await?;
            AppResult::Ok(Some(entrada))
        }
        .await;

        match resultado {
            Ok(Some(entrada)) => {
                info!(
                    saida_id = saida.id,
                    entrada_id = entrada.id,
                    "📋 Vistoria de entrada pendente gerada"
                );
                Some(entrada)
            }
            Ok(None) => {
                debug!(saida_id = saida.id, "Entrada pendente já existe");
                None
            }
            Err(e) => {
                warn!(
                    saida_id = saida.id,
                    error = %e,
                    "⚠️ Não foi possível gerar a vistoria de entrada pendente"
                );
                None
            }
        }
    }
}

async fn verificar_locacao<T: StoreTx>(tx: &mut T, locacao_id: DbId) -> AppResult<()> {
    if tx.find_locacao(locacao_id).await?.is_none() {
        return Err(not_found_error("Locação", locacao_id));
    }
    Ok(())
}
