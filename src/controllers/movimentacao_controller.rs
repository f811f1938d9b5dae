use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::movimentacao_dto::{
    CreateMovimentacaoRequest, ListMovimentacoesQuery, UpdateMovimentacaoRequest,
};
use crate::models::movimentacao::MovimentacaoFinanceira;
use crate::models::DbId;
use crate::repositories::Store;
use crate::services::MovimentacaoService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct MovimentacaoController<S: Store> {
    service: MovimentacaoService<S>,
}

impl<S: Store> MovimentacaoController<S> {
    pub fn new(state: &AppState<S>) -> Self {
        Self {
            service: state.movimentacao_service(),
        }
    }

    pub async fn list(
        &self,
        query: ListMovimentacoesQuery,
    ) -> AppResult<ApiResponse<Vec<MovimentacaoFinanceira>>> {
        let movimentacoes = self.service.listar(query.locacao_id).await?;
        Ok(ApiResponse::success(movimentacoes))
    }

    pub async fn get_by_id(&self, id: DbId) -> AppResult<ApiResponse<MovimentacaoFinanceira>> {
        let movimentacao = self.service.obter(id).await?;
        Ok(ApiResponse::success(movimentacao))
    }

    pub async fn create(
        &self,
        request: CreateMovimentacaoRequest,
    ) -> AppResult<ApiResponse<MovimentacaoFinanceira>> {
        request.validate()?;

        let movimentacao = self.service.criar(request.into()).await?;
        Ok(ApiResponse::success_with_message(
            movimentacao,
            "Movimentação registrada com sucesso",
        ))
    }

    pub async fn update(
        &self,
        id: DbId,
        request: UpdateMovimentacaoRequest,
    ) -> AppResult<ApiResponse<MovimentacaoFinanceira>> {
        request.validate()?;

        let movimentacao = self.service.atualizar(id, request.into()).await?;
        Ok(ApiResponse::success_with_message(
            movimentacao,
            "Movimentação atualizada com sucesso",
        ))
    }

    pub async fn delete(&self, id: DbId) -> AppResult<ApiResponse<()>> {
        self.service.excluir(id).await?;
        Ok(ApiResponse::message("Movimentação excluída com sucesso"))
    }
}
