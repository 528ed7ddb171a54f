//! Traducción central de `InventoryError` a respuestas HTTP.


use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::Serialize;
use crate::config::inventario::FORMATO_FECHA_LEGIBLE;
use crate::error::domain::{FieldError, InventoryError};
use crate::mapper::logic::format_fecha;


/// Cuerpo JSON de todas las respuestas de error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}


impl ErrorBody {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            timestamp: format_fecha(&Local::now().naive_local()),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message,
            detail: None,
            fields: Vec::new(),
        }
    }

    fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}


impl InventoryError {
    pub fn status(&self) -> StatusCode {
        match self {
            InventoryError::Validation(_)
            | InventoryError::MalformedBody(_)
            | InventoryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            InventoryError::ProveedorNotFound(_)
            | InventoryError::SemillaNotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::ProveedorAlreadyExists(_)
            | InventoryError::SemillaAlreadyExists(_)
            | InventoryError::ConflictStorage(_) => StatusCode::CONFLICT,
            InventoryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}


impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = match self {
            InventoryError::Validation(fields) => ErrorBody {
                fields,
                ..ErrorBody::new(status, message)
            },
            InventoryError::MalformedBody(detail) => ErrorBody::new(
                status,
                format!("Cuerpo JSON inválido (revisa formatos y tipos). Fecha esperada: {FORMATO_FECHA_LEGIBLE}"),
            )
                .with_detail(detail),
            InventoryError::ConflictStorage(detail) => {
                tracing::warn!(%detail, "Warn: conflicto en el almacén");
                ErrorBody::new(status, "Conflicto de datos (clave duplicada o restricción)".to_string())
                    .with_detail(detail)
            }
            InventoryError::Internal(_) => {
                tracing::error!(%message, "Error: fallo interno no clasificado");
                ErrorBody::new(status, message)
            }
            _ => ErrorBody::new(status, message),
        };

        (status, Json(body)).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: InventoryError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_entity_and_key() {
        let (status, body) = body_of(InventoryError::SemillaNotFound("S404".into())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["message"], "La semilla con código 'S404' no existe");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let (status, body) = body_of(InventoryError::Validation(vec![
            FieldError::new("stock", "El stock debe ser mayor o igual a 0"),
        ]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "stock: El stock debe ser mayor o igual a 0");
        assert_eq!(body["fields"][0]["field"], "stock");
    }

    #[tokio::test]
    async fn storage_conflict_carries_driver_detail() {
        let (status, body) = body_of(InventoryError::ConflictStorage("fk_violation".into())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Conflicto de datos (clave duplicada o restricción)");
        assert_eq!(body["detail"], "fk_violation");
    }

    #[tokio::test]
    async fn duplicates_are_conflicts() {
        let (status, body) = body_of(InventoryError::ProveedorAlreadyExists("9".into())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Ya existe un proveedor con NIT '9'");
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn internal_errors_expose_their_text() {
        let (status, body) = body_of(InventoryError::Internal("pool timed out".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "pool timed out");
    }
}
