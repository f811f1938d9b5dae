use async_trait::async_trait;

use super::{ClienteRepository, PgTx};
use crate::models::cliente::Cliente;
use crate::models::DbId;
use crate::utils::errors::AppResult;

#[async_trait]
impl ClienteRepository for PgTx {
    async fn find_cliente(&mut self, id: DbId) -> AppResult<Option<Cliente>> {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(cliente)
    }
}
