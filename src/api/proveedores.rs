use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use crate::api::extractors::{JsonBody, KeyPath, QueryParams};
use crate::config::http::{BASE_PATH, PROVEEDORES};
use crate::context::domain::AppContext;
use crate::database::domain::Store;
use crate::error::domain::InventoryError;
use crate::proveedor::domain::{ProveedorListParams, ProveedorRequest, ProveedorResponse};
use crate::proveedor::logic;
use crate::semilla::domain::Top2SemillasResponse;


pub fn router<S: Store>() -> Router<AppContext<S>> {
    let base = format!("{BASE_PATH}{PROVEEDORES}");

    Router::new()
        .route(&base, get(list_handler::<S>).post(create_handler::<S>))
        .route(&format!("{base}/:nit"), get(get_handler::<S>).put(update_handler::<S>).delete(delete_handler::<S>))
        .route(&format!("{base}/:nit/top2"), get(top2_handler::<S>))
}


#[tracing::instrument(skip(ctx))]
pub async fn list_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    QueryParams(params): QueryParams<ProveedorListParams>,
) -> Result<Json<Vec<ProveedorResponse>>, InventoryError> {
    Ok(Json(logic::list(&ctx.repo, params).await?))
}


#[tracing::instrument(skip(ctx))]
pub async fn get_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(nit): KeyPath,
) -> Result<Json<ProveedorResponse>, InventoryError> {
    Ok(Json(logic::get(&ctx.repo, &nit).await?))
}


#[tracing::instrument(skip(ctx, req))]
pub async fn create_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    JsonBody(req): JsonBody<ProveedorRequest>,
) -> Result<impl IntoResponse, InventoryError> {
    let creado = logic::create(&ctx.repo, req).await?;
    let location = format!("{BASE_PATH}{PROVEEDORES}/{}", creado.nit);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(creado)))
}


#[tracing::instrument(skip(ctx, req))]
pub async fn update_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(nit): KeyPath,
    JsonBody(req): JsonBody<ProveedorRequest>,
) -> Result<Json<ProveedorResponse>, InventoryError> {
    Ok(Json(logic::update(&ctx.repo, &nit, req).await?))
}


#[tracing::instrument(skip(ctx))]
pub async fn delete_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(nit): KeyPath,
) -> Result<StatusCode, InventoryError> {
    logic::delete(&ctx.repo, &nit).await?;
    Ok(StatusCode::NO_CONTENT)
}


#[tracing::instrument(skip(ctx))]
pub async fn top2_handler<S: Store>(
    State(ctx): State<AppContext<S>>,
    KeyPath(nit): KeyPath,
) -> Result<Json<Top2SemillasResponse>, InventoryError> {
    Ok(Json(logic::top2(&ctx.repo, &nit).await?))
}
