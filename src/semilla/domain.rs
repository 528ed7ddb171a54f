//! Dominio de Semillas (lotes de inventario).


use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::mapper::logic::fecha_opcional;
use crate::proveedor::domain::ProveedorResponse;


/// Registro de la tabla `semillas`.
///
/// `proveedor_nit` es una referencia por clave, sin propiedad sobre el proveedor.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Semilla {
    pub codigo: String,
    pub nombre: String,
    pub precio: f64,
    pub stock: i32,
    pub tipo_semilla: String,
    pub porcentaje_germinacion: f64,
    pub fecha_ingreso: NaiveDateTime,
    pub proveedor_nit: String,
}


/// Cuerpo de entrada para crear o actualizar una semilla.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemillaRequest {
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub tipo_semilla: String,
    #[serde(default)]
    pub porcentaje_germinacion: f64,
    #[serde(default)]
    pub proveedor_nit: String,
    #[serde(default, with = "fecha_opcional")]
    pub fecha_ingreso: Option<NaiveDateTime>,
}


#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemillaResponse {
    pub codigo: String,
    pub nombre: String,
    pub precio: f64,
    pub stock: i32,
    pub tipo_semilla: String,
    pub porcentaje_germinacion: f64,
    pub proveedor_nit: String,
    pub fecha_ingreso: String,
}


/// Proveedor junto a sus dos lotes más recientes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Top2SemillasResponse {
    pub proveedor: ProveedorResponse,
    pub semillas: Vec<SemillaResponse>,
}


/// Parámetros crudos de `GET /semillas`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemillaListParams {
    pub tipo: Option<String>,
    pub germinacion_min: Option<String>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
}


/// Filtros ya interpretados; cualquiera puede faltar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemillaCriterios {
    pub tipo: Option<String>,
    pub germinacion_min: Option<f64>,
    pub desde: Option<NaiveDateTime>,
    pub hasta: Option<NaiveDateTime>,
}


/// Consulta que se envía al almacén.
///
/// Las tres primeras variantes son consultas directas con su propio orden;
/// `Combinada` carga todo y filtra en memoria con AND.
#[derive(Debug, Clone, PartialEq)]
pub enum SemillaConsulta {
    /// Coincidencia exacta de `tipo_semilla`, ordenada por código.
    Tipo(String),
    /// `porcentaje_germinacion >= min`, de mayor a menor germinación.
    GerminacionDesde(f64),
    /// `fecha_ingreso` en `[desde, hasta]`, de la más reciente a la más antigua.
    RangoFechas { desde: NaiveDateTime, hasta: NaiveDateTime },
    Combinada(SemillaCriterios),
}
