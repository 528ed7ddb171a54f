use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use crate::api::extractors::{JsonBody, KeyPath, QueryParams};
use crate::config::http::{BASE_PATH, SEMILLAS};
use crate::context::domain::AppContext;
use crate::database::domain::Store;
use crate::error::domain::InventoryError;
use crate::semilla::domain::{SemillaListParams, SemillaRequest, SemillaResponse};
use crate::semilla::logic;


pub fn router<S: Store>() -> Router<AppContext<S>> {
    let base = format!("{BASE_PATH}{SEMILLAS}");

    Router::new()
        .route(&base, get(list_handler::<S>).post(create_handler::<S>))
        .route(&format!("{base}/:codigo"), get(get_handler::<S>).put(update_handler::<S>).delete(delete_handler::<S>))
}


#[tracing::instrument(skip(ctx))]
pub async fn list_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    QueryParams(params): QueryParams<SemillaListParams>,
) -> Result<Json<Vec<SemillaResponse>>, InventoryError> {
    Ok(Json(logic::list(&ctx.repo, params).await?))
}


#[tracing::instrument(skip(ctx))]
pub async fn get_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(codigo): KeyPath,
) -> Result<Json<SemillaResponse>, InventoryError> {
    Ok(Json(logic::get(&ctx.repo, &codigo).await?))
}


#[tracing::instrument(skip(ctx, req))]
pub async fn create_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    JsonBody(req): JsonBody<SemillaRequest>,
) -> Result<impl IntoResponse, InventoryError> {
    let creada = logic::create(&ctx.repo, req).await?;
    let location = format!("{BASE_PATH}{SEMILLAS}/{}", creada.codigo);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(creada)))
}


#[tracing::instrument(skip(ctx, req))]
pub async fn update_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(codigo): KeyPath,
    JsonBody(req): JsonBody<SemillaRequest>,
) -> Result<Json<SemillaResponse>, InventoryError> {
    Ok(Json(logic::update(&ctx.repo, &codigo, req).await?))
}


#[tracing::instrument(skip(ctx))]
pub async fn delete_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(codigo): KeyPath,
) -> Result<StatusCode, InventoryError> {
    logic::delete(&ctx.repo, &codigo).await?;
    Ok(StatusCode::NO_CONTENT)
}
