use async_trait::async_trait;
use sqlx::types::Json;

use super::{PgTx, VistoriaRepository};
use crate::models::vistoria::{NovaVistoria, Vistoria, VistoriaFiltro, VISTORIADOR_SISTEMA};
use crate::models::DbId;
use crate::utils::errors::AppResult;

#[async_trait]
impl VistoriaRepository for PgTx {
    async fn insert_vistoria(&mut self, nova: &NovaVistoria) -> AppResult<Vistoria> {
        let c = &nova.checklist;
        let vistoria = sqlx::query_as::<_, Vistoria>(
            r#"
            INSERT INTO vistorias (
                locacao_id, veiculo_id, cliente_id, tipo_vistoria, data_vistoria,
                placa, modelo, cor, nome_condutor, rg_condutor, telefone_condutor,
                quilometragem, nivel_combustivel, observacoes, avarias, fotos,
                item_calota, item_pneu, item_antena, item_bateria, item_estepe, item_macaco,
                item_chave_roda, item_triangulo, item_extintor, item_tapetes, item_som,
                item_documentos, item_higienizacao,
                assinatura_cliente, assinatura_vistoriador, nome_vistoriador
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29,
                    $30, $31, $32)
            RETURNING *
            "#,
        )
        .bind(nova.locacao_id)
        .bind(nova.veiculo_id)
        .bind(nova.cliente_id)
        .bind(nova.tipo_vistoria)
        .bind(nova.data_vistoria)
        .bind(&nova.placa)
        .bind(&nova.modelo)
        .bind(&nova.cor)
        .bind(&nova.nome_condutor)
        .bind(&nova.rg_condutor)
        .bind(&nova.telefone_condutor)
        .bind(nova.quilometragem)
        .bind(&nova.nivel_combustivel)
        .bind(&nova.observacoes)
        .bind(Json(&nova.avarias))
        .bind(Json(&nova.fotos))
        .bind(c.item_calota)
        .bind(c.item_pneu)
        .bind(c.item_antena)
        .bind(c.item_bateria)
        .bind(c.item_estepe)
        .bind(c.item_macaco)
        .bind(c.item_chave_roda)
        .bind(c.item_triangulo)
        .bind(c.item_extintor)
        .bind(c.item_tapetes)
        .bind(c.item_som)
        .bind(c.item_documentos)
        .bind(c.item_higienizacao)
        .bind(&nova.assinatura_cliente)
        .bind(&nova.assinatura_vistoriador)
        .bind(&nova.nome_vistoriador)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(vistoria)
    }

    async fn find_vistoria(&mut self, id: DbId) -> AppResult<Option<Vistoria>> {
        let vistoria = sqlx::query_as::<_, Vistoria>("SELECT * FROM vistorias WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(vistoria)
    }

    async fn update_vistoria(&mut self, v: &Vistoria) -> AppResult<Vistoria> {
        let c = &v.checklist;
        let vistoria = sqlx::query_as::<_, Vistoria>(
            r#"
            UPDATE vistorias
            SET locacao_id = $2, quilometragem = $3, nivel_combustivel = $4, nome_condutor = $5,
                observacoes = $6, avarias = $7, fotos = $8,
                item_calota = $9, item_pneu = $10, item_antena = $11, item_bateria = $12,
                item_estepe = $13, item_macaco = $14, item_chave_roda = $15,
                item_triangulo = $16, item_extintor = $17, item_tapetes = $18, item_som = $19,
                item_documentos = $20, item_higienizacao = $21,
                assinatura_cliente = $22, assinatura_vistoriador = $23, nome_vistoriador = $24,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(v.id)
        .bind(v.locacao_id)
        .bind(v.quilometragem)
        .bind(&v.nivel_combustivel)
        .bind(&v.nome_condutor)
        .bind(&v.observacoes)
        .bind(&v.avarias)
        .bind(&v.fotos)
        .bind(c.item_calota)
        .bind(c.item_pneu)
        .bind(c.item_antena)
        .bind(c.item_bateria)
        .bind(c.item_estepe)
        .bind(c.item_macaco)
        .bind(c.item_chave_roda)
        .bind(c.item_triangulo)
        .bind(c.item_extintor)
        .bind(c.item_tapetes)
        .bind(c.item_som)
        .bind(c.item_documentos)
        .bind(c.item_higienizacao)
        .bind(&v.assinatura_cliente)
        .bind(&v.assinatura_vistoriador)
        .bind(&v.nome_vistoriador)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(vistoria)
    }

    async fn delete_vistoria(&mut self, id: DbId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vistorias WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_vistorias_da_locacao(&mut self, locacao_id: DbId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM vistorias WHERE locacao_id = $1")
            .bind(locacao_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_vistorias(&mut self, filtro: &VistoriaFiltro) -> AppResult<Vec<Vistoria>> {
        let vistorias = sqlx::query_as::<_, Vistoria>(
            r#"
            SELECT * FROM vistorias
            WHERE ($1::bigint IS NULL OR locacao_id = $1)
              AND ($2::bigint IS NULL OR veiculo_id = $2)
              AND ($3::bigint IS NULL OR cliente_id = $3)
              AND ($4::tipo_vistoria IS NULL OR tipo_vistoria = $4)
              AND (NOT $5 OR nome_vistoriador = $6)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filtro.locacao_id)
        .bind(filtro.veiculo_id)
        .bind(filtro.cliente_id)
        .bind(filtro.tipo_vistoria)
        .bind(filtro.pendentes)
        .bind(VISTORIADOR_SISTEMA)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(vistorias)
    }
}
