use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::vistoria_controller::VistoriaController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vistoria_dto::{CreateVistoriaRequest, ListVistoriasQuery, UpdateVistoriaRequest};
use crate::models::vistoria::Vistoria;
use crate::models::DbId;
use crate::repositories::Store;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vistoria_router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(list_vistorias::<S>).post(create_vistoria::<S>))
        .route(
            "/:id",
            get(get_vistoria::<S>)
                .put(update_vistoria::<S>)
                .delete(delete_vistoria::<S>),
        )
}

async fn list_vistorias<S: Store>(
    State(state): State<AppState<S>>,
    query: Result<Query<ListVistoriasQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Vistoria>>>, AppError> {
    let Query(query) = query?;
    let response = VistoriaController::new(&state).list(query).await?;
    Ok(Json(response))
}

async fn get_vistoria<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<Vistoria>>, AppError> {
    let Path(id) = id?;
    let response = VistoriaController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_vistoria<S: Store>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateVistoriaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Vistoria>>), AppError> {
    let Json(request) = payload?;
    let response = VistoriaController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vistoria<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateVistoriaRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vistoria>>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let response = VistoriaController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vistoria<S: Store>(
    State(state): State<AppState<S>>,
    id: Result<Path<DbId>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Path(id) = id?;
    let response = VistoriaController::new(&state).delete(id).await?;
    Ok(Json(response))
}
