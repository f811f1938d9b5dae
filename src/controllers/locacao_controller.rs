use chrono::{Local, NaiveDate};
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::locacao_dto::{CreateLocacaoRequest, ListLocacoesQuery, UpdateLocacaoRequest};
use crate::models::contrato::ContratoData;
use crate::models::locacao::{Locacao, LocacaoResumo};
use crate::models::DbId;
use crate::repositories::Store;
use crate::services::LocacaoService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct LocacaoController<S: Store> {
    service: LocacaoService<S>,
}

impl<S: Store> LocacaoController<S> {
    pub fn new(state: &AppState<S>) -> Self {
        Self {
            service: state.locacao_service(),
        }
    }

    pub async fn list(&self, query: ListLocacoesQuery) -> AppResult<ApiResponse<Vec<LocacaoResumo>>> {
        let filtro = query.into_filtro()?;
        let locacoes = self.service.listar(&filtro).await?;
        Ok(ApiResponse::success(locacoes))
    }

    pub async fn get_by_id(&self, id: DbId) -> AppResult<ApiResponse<Locacao>> {
        let locacao = self.service.obter(id).await?;
        Ok(ApiResponse::success(locacao))
    }

    pub async fn create(&self, request: CreateLocacaoRequest) -> AppResult<ApiResponse<Locacao>> {
        request.validate()?;

        let locacao = self.service.criar(request.into()).await?;
        Ok(ApiResponse::success_with_message(
            locacao,
            "Locação criada com sucesso",
        ))
    }

    pub async fn update(
        &self,
        id: DbId,
        request: UpdateLocacaoRequest,
    ) -> AppResult<ApiResponse<Locacao>> {
        request.validate()?;

        let locacao = self.service.atualizar(id, request.into()).await?;
        Ok(ApiResponse::success_with_message(
            locacao,
            "Locação atualizada com sucesso",
        ))
    }

    pub async fn delete(&self, id: DbId) -> AppResult<ApiResponse<()>> {
        self.service.excluir(id).await?;
        Ok(ApiResponse::message("Locação excluída com sucesso"))
    }

    pub async fn contrato_data(&self, id: DbId) -> AppResult<ApiResponse<ContratoData>> {
        let hoje: NaiveDate = Local::now().date_naive();
        let contrato = self.service.contrato_data(id, hoje).await?;
        Ok(ApiResponse::success(contrato))
    }
}
