use async_trait::async_trait;

use super::{PgTx, VeiculoRepository};
use crate::models::veiculo::{Veiculo, VeiculoStatus};
use crate::models::DbId;
use crate::utils::errors::AppResult;

#[async_trait]
impl VeiculoRepository for PgTx {
    async fn find_veiculo(&mut self, id: DbId) -> AppResult<Option<Veiculo>> {
        let veiculo = sqlx::query_as::<_, Veiculo>("SELECT * FROM veiculos WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(veiculo)
    }

    async fn find_veiculo_for_update(&mut self, id: DbId) -> AppResult<Option<Veiculo>> {
        let veiculo =
            sqlx::query_as::<_, Veiculo>("SELECT * FROM veiculos WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;

        Ok(veiculo)
    }

    async fn set_veiculo_status(&mut self, id: DbId, status: VeiculoStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE veiculos SET status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
