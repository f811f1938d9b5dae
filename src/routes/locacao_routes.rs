use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::locacao_controller::LocacaoController;
use crate::dto::api_response::ApiResponse;
use crate::dto::locacao_dto::{CreateLocacaoRequest, ListLocacoesQuery, UpdateLocacaoRequest};
use crate::models::contrato::ContratoData;
use crate::models::locacao::{Locacao, LocacaoResumo};
use crate::models::DbId;
use crate::repositories::Store;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_locacao_router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(list_locacoes::<S>).post(create_locacao::<S>))
        .route(
            "/:id",
            get(get_locacao::<S>)
                .put(update_locacao::<S>)
                .delete(delete_locacao::<S>),
        )
        .route("/:id/contrato-data", get(get_contrato_data::<S>))
}

async fn list_locacoes<S: Store>(
    State(state): State<AppState<S>>,
    query: Result<Query<ListLocacoesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LocacaoResumo>>>, AppError> {
    let Query(query) = query?;
    let response = LocacaoController::new(&state).list(query).await?;
    Ok(Json(response))
}

async fn get_locacao<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<Locacao>>, AppError> {
    let Path(id) = id?;
    let response = LocacaoController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_locacao<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateLocacaoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Locacao>>), AppError> {
    let Json(request) = payload?;
    let response = LocacaoController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_locacao<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateLocacaoRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Locacao>>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let response = LocacaoController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_locacao<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Path(id) = id?;
    let response = LocacaoController::new(&state).delete(id).await?;
    Ok(Json(response))
}

async fn get_contrato_data<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<ContratoData>>, AppError> {
    let Path(id) = id?;
    let response = LocacaoController::new(&state).contrato_data(id).await?;
    Ok(Json(response))
}
