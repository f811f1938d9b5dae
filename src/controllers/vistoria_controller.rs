use chrono::Utc;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vistoria_dto::{CreateVistoriaRequest, ListVistoriasQuery, UpdateVistoriaRequest};
use crate::models::vistoria::Vistoria;
use crate::models::DbId;
use crate::repositories::Store;
use crate::services::VistoriaService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct VistoriaController<S: Store> {
    service: VistoriaService<S>,
}

impl<S: Store> VistoriaController<S> {
    pub fn new(state: &AppState<S>) -> Self {
        Self {
            service: state.vistoria_service(),
        }
    }

    pub async fn list(&self, query: ListVistoriasQuery) -> AppResult<ApiResponse<Vec<Vistoria>>> {
        let vistorias = self.service.listar(&query.into()).await?;
        Ok(ApiResponse::success(vistorias))
    }

    pub async fn get_by_id(&self, id: DbId) -> AppResult<ApiResponse<Vistoria>> {
        let vistoria = self.service.obter(id).await?;
        Ok(ApiResponse::success(vistoria))
    }

    pub async fn create(&self, request: CreateVistoriaRequest) -> AppResult<ApiResponse<Vistoria>> {
        request.validate()?;

        let vistoria = self.service.criar(request.into_nova(Utc::now())).await?;
        Ok(ApiResponse::success_with_message(
            vistoria,
            "Vistoria criada com sucesso",
        ))
    }

    pub async fn update(
        &self,
        id: DbId,
        request: UpdateVistoriaRequest,
    ) -> AppResult<ApiResponse<Vistoria>> {
        request.validate()?;

        let vistoria = self.service.atualizar(id, request.into()).await?;
        Ok(ApiResponse::success_with_message(
            vistoria,
            "Vistoria atualizada com sucesso",
        ))
    }

    pub async fn delete(&self, id: DbId) -> AppResult<ApiResponse<()>> {
        self.service.excluir(id).await?;
        Ok(ApiResponse::message("Vistoria excluída com sucesso"))
    }
}
