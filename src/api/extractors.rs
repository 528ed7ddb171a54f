//! Extractores que responden sus rechazos con el cuerpo de error común en
//! lugar del texto plano de axum.


use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use crate::error::domain::InventoryError;


/// `Json<T>` cuyo rechazo (cuerpo malformado, tipos o fechas inválidas) se
/// traduce a `InventoryError::MalformedBody`.
pub struct JsonBody<T>(pub T);


#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| InventoryError::MalformedBody(rejection.body_text()))?;

        Ok(JsonBody(value))
    }
}


/// Parámetros de consulta. Una cadena que no encaja en `T` (por ejemplo una
/// clave repetida) es un error de validación sobre `query`.
pub struct QueryParams<T>(pub T);


#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| InventoryError::field("query", rejection.body_text()))?;

        Ok(QueryParams(value))
    }
}


/// Clave natural (`nit` o `codigo`) tomada del único segmento variable de la ruta.
pub struct KeyPath(pub String);


#[async_trait]
impl<S> FromRequestParts<S> for KeyPath
where
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(key) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| InventoryError::InvalidArgument(rejection.body_text()))?;

        Ok(KeyPath(key))
    }
}
