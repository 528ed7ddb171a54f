//! Dominio de Proveedores.
//!
//! Define el registro almacenado (`Proveedor`), los DTO de la API y el filtro
//! de listado ya resuelto según la precedencia de parámetros.


use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::mapper::logic::fecha_opcional;


/// Registro de la tabla `proveedores`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Proveedor {
    pub nit: String,
    pub nombre: String,
    pub ciudad: String,
    pub telefono: String,
    pub fecha_registro: NaiveDateTime,
    pub activo: bool,
}


/// Cuerpo de entrada para crear o actualizar un proveedor.
///
/// Los campos ausentes se reciben vacíos para que la validación los reporte
/// todos juntos en lugar de fallar en el primero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveedorRequest {
    #[serde(default)]
    pub nit: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub ciudad: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default, with = "fecha_opcional")]
    pub fecha_registro: Option<NaiveDateTime>,
    #[serde(default)]
    pub activo: Option<bool>,
}


#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveedorResponse {
    pub nit: String,
    pub nombre: String,
    pub ciudad: String,
    pub telefono: String,
    pub fecha_registro: String,
    pub activo: bool,
}


/// Parámetros crudos de `GET /proveedores`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProveedorListParams {
    pub nombre: Option<String>,
    pub ciudad: Option<String>,
    pub activo: Option<String>,
}


/// Consulta de listado resuelta. Sólo una variante aplica por petición.
#[derive(Debug, Clone, PartialEq)]
pub enum ProveedorFiltro {
    /// Subcadena de `nombre` sin distinguir mayúsculas.
    Nombre(String),
    CiudadYActivo { ciudad: String, activo: bool },
    Ciudad(String),
    Activo(bool),
    Todos,
}
