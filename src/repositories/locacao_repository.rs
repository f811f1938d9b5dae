use async_trait::async_trait;
use chrono::NaiveDate;

use super::{LocacaoRepository, PgTx};
use crate::models::locacao::{
    Locacao, LocacaoFiltro, LocacaoResumo, LocacaoStatus, NovaLocacao, Periodo,
};
use crate::models::DbId;
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
impl LocacaoRepository for PgTx {
    async fn insert_locacao(&mut self, nova: &NovaLocacao) -> AppResult<Locacao> {
        let locacao = sqlx::query_as::<_, Locacao>(
            r#"
            INSERT INTO locacoes (cliente_id, veiculo_id, data_locacao, data_entrega, valor_diaria,
                                  valor_total, valor_caucao, valor_seguro, status, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(nova.cliente_id)
        .bind(nova.veiculo_id)
        .bind(nova.data_locacao)
        .bind(nova.data_entrega)
        .bind(nova.valor_diaria)
        .bind(nova.valor_total)
        .bind(nova.valor_caucao)
        .bind(nova.valor_seguro)
        .bind(nova.status)
        .bind(&nova.observacoes)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::from_overlap_violation)?;

        Ok(locacao)
    }

    async fn find_locacao(&mut self, id: DbId) -> AppResult<Option<Locacao>> {
        let locacao = sqlx::query_as::<_, Locacao>("SELECT * FROM locacoes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(locacao)
    }

    async fn find_locacao_for_update(&mut self, id: DbId) -> AppResult<Option<Locacao>> {
        let locacao =
            sqlx::query_as::<_, Locacao>("SELECT * FROM locacoes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;

        Ok(locacao)
    }

    async fn update_locacao(&mut self, locacao: &Locacao) -> AppResult<Locacao> {
        let atualizada = sqlx::query_as::<_, Locacao>(
            r#"
            UPDATE locacoes
            SET cliente_id = $2, veiculo_id = $3, data_locacao = $4, data_entrega = $5,
                valor_diaria = $6, valor_total = $7, valor_caucao = $8, valor_seguro = $9,
                status = $10, observacoes = $11, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(locacao.id)
        .bind(locacao.cliente_id)
        .bind(locacao.veiculo_id)
        .bind(locacao.data_locacao)
        .bind(locacao.data_entrega)
        .bind(locacao.valor_diaria)
        .bind(locacao.valor_total)
        .bind(locacao.valor_caucao)
        .bind(locacao.valor_seguro)
        .bind(locacao.status)
        .bind(&locacao.observacoes)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::from_overlap_violation)?;

        Ok(atualizada)
    }

    async fn delete_locacao(&mut self, id: DbId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM locacoes WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_overlap(
        &mut self,
        veiculo_id: DbId,
        periodo: Periodo,
        excluir: Option<DbId>,
    ) -> AppResult<bool> {
        // s1 <= e2 AND e1 >= s2, limites inclusivos
        let (existe,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM locacoes
                WHERE veiculo_id = $1
                  AND status = 'ativa'
                  AND data_locacao <= $3
                  AND data_entrega >= $2
                  AND ($4::bigint IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(veiculo_id)
        .bind(periodo.inicio)
        .bind(periodo.fim)
        .bind(excluir)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(existe)
    }

    async fn count_ativas_do_veiculo(
        &mut self,
        veiculo_id: DbId,
        excluir: Option<DbId>,
    ) -> AppResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM locacoes
            WHERE veiculo_id = $1
              AND status = 'ativa'
              AND ($2::bigint IS NULL OR id <> $2)
            "#,
        )
        .bind(veiculo_id)
        .bind(excluir)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(total)
    }

    async fn list_locacoes(&mut self, filtro: &LocacaoFiltro) -> AppResult<Vec<LocacaoResumo>> {
        let padrao = filtro.termo().map(|t| format!("%{}%", t));

        let locacoes = sqlx::query_as::<_, LocacaoResumo>(
            r#"
            SELECT l.*,
                   c.nome AS cliente_nome,
                   v.marca || ' ' || v.modelo || ' - ' || v.placa AS veiculo_info
            FROM locacoes l
            JOIN clientes c ON c.id = l.cliente_id
            JOIN veiculos v ON v.id = l.veiculo_id
            WHERE ($1::locacao_status IS NULL OR l.status = $1)
              AND ($2::text IS NULL
                   OR c.nome ILIKE $2
                   OR v.marca ILIKE $2
                   OR v.modelo ILIKE $2
                   OR v.placa ILIKE $2)
            ORDER BY l.created_at DESC, l.id DESC
            "#,
        )
        .bind(filtro.status)
        .bind(padrao)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(locacoes)
    }

    async fn find_expiradas_for_update(&mut self, hoje: NaiveDate) -> AppResult<Vec<Locacao>> {
        let locacoes = sqlx::query_as::<_, Locacao>(
            r#"
            SELECT * FROM locacoes
            WHERE status = $1 AND data_entrega < $2
            ORDER BY data_entrega, id
            FOR UPDATE
            "#,
        )
        .bind(LocacaoStatus::Ativa)
        .bind(hoje)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(locacoes)
    }
}
