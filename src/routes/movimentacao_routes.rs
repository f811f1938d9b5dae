use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::movimentacao_controller::MovimentacaoController;
use crate::dto::api_response::ApiResponse;
use crate::dto::movimentacao_dto::{
    CreateMovimentacaoRequest, ListMovimentacoesQuery, UpdateMovimentacaoRequest,
};
use crate::models::movimentacao::MovimentacaoFinanceira;
use crate::models::DbId;
use crate::repositories::Store;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_movimentacao_router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/",
            get(list_movimentacoes::<S>).post(create_movimentacao::<S>),
        )
        .route(
            "/:id",
            get(get_movimentacao::<S>)
                .put(update_movimentacao::<S>)
                .delete(delete_movimentacao::<S>),
        )
}

async fn list_movimentacoes<S: Store>(
    State(state): State<AppState<S>>,
    query: Result<Query<ListMovimentacoesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<MovimentacaoFinanceira>>>, AppError> {
    let Query(query) = query?;
    let response = MovimentacaoController::new(&state).list(query).await?;
    Ok(Json(response))
}

async fn get_movimentacao<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<MovimentacaoFinanceira>>, AppError> {
    let Path(id) = id?;
    let response = MovimentacaoController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_movimentacao<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateMovimentacaoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<MovimentacaoFinanceira>>), AppError> {
    let Json(request) = payload?;
    let response = MovimentacaoController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_movimentacao<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateMovimentacaoRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<MovimentacaoFinanceira>>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let response = MovimentacaoController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_movimentacao<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Path(id) = id?;
    let response = MovimentacaoController::new(&state).delete(id).await?;
    Ok(Json(response))
}
