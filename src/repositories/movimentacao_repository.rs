use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{MovimentacaoRepository, PgTx};
use crate::models::movimentacao::{ChaveMovimentacao, MovimentacaoFinanceira, NovaMovimentacao};
use crate::models::DbId;
use crate::utils::errors::AppResult;

#[async_trait]
impl MovimentacaoRepository for PgTx {
    async fn find_movimentacao(
        &mut self,
        chave: ChaveMovimentacao,
    ) -> AppResult<Option<MovimentacaoFinanceira>> {
        let movimentacao = sqlx::query_as::<_, MovimentacaoFinanceira>(
            r#"
            SELECT * FROM movimentacoes_financeiras
            WHERE locacao_id = $1 AND tipo = $2 AND categoria = $3
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(chave.locacao_id)
        .bind(chave.tipo)
        .bind(chave.categoria)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(movimentacao)
    }

    async fn find_movimentacao_by_id(
        &mut self,
        id: DbId,
    ) -> AppResult<Option<MovimentacaoFinanceira>> {
        let movimentacao = sqlx::query_as::<_, MovimentacaoFinanceira>(
            "SELECT * FROM movimentacoes_financeiras WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(movimentacao)
    }

    async fn insert_movimentacao(
        &mut self,
        nova: &NovaMovimentacao,
    ) -> AppResult<MovimentacaoFinanceira> {
        let movimentacao = sqlx::query_as::<_, MovimentacaoFinanceira>(
            r#"
            INSERT INTO movimentacoes_financeiras
                (tipo, categoria, descricao, valor, data_movimentacao, locacao_id, cliente_id,
                 observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(nova.tipo)
        .bind(&nova.categoria)
        .bind(&nova.descricao)
        .bind(nova.valor)
        .bind(nova.data_movimentacao)
        .bind(nova.locacao_id)
        .bind(nova.cliente_id)
        .bind(&nova.observacoes)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(movimentacao)
    }

    async fn update_movimentacao_valor(
        &mut self,
        id: DbId,
        valor: Decimal,
        descricao: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE movimentacoes_financeiras SET valor = $2, descricao = $3 WHERE id = $1")
            .bind(id)
            .bind(valor)
            .bind(descricao)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn update_movimentacao(
        &mut self,
        movimentacao: &MovimentacaoFinanceira,
    ) -> AppResult<MovimentacaoFinanceira> {
        let salva = sqlx::query_as::<_, MovimentacaoFinanceira>(
            r#"
            UPDATE movimentacoes_financeiras
            SET tipo = $2, categoria = $3, descricao = $4, valor = $5,
                data_movimentacao = $6, cliente_id = $7, observacoes = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(movimentacao.id)
        .bind(movimentacao.tipo)
        .bind(&movimentacao.categoria)
        .bind(&movimentacao.descricao)
        .bind(movimentacao.valor)
        .bind(movimentacao.data_movimentacao)
        .bind(movimentacao.cliente_id)
        .bind(&movimentacao.observacoes)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(salva)
    }

    async fn delete_movimentacao(&mut self, id: DbId) -> AppResult<()> {
        sqlx::query("DELETE FROM movimentacoes_financeiras WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn delete_movimentacoes_da_locacao(&mut self, locacao_id: DbId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM movimentacoes_financeiras WHERE locacao_id = $1")
            .bind(locacao_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_movimentacoes(
        &mut self,
        locacao_id: Option<DbId>,
    ) -> AppResult<Vec<MovimentacaoFinanceira>> {
        let movimentacoes = sqlx::query_as::<_, MovimentacaoFinanceira>(
            r#"
            SELECT * FROM movimentacoes_financeiras
            WHERE ($1::bigint IS NULL OR locacao_id = $1)
            ORDER BY data_movimentacao DESC, id DESC
            "#,
        )
        .bind(locacao_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(movimentacoes)
    }
}
