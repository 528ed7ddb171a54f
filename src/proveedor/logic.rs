//! Casos de uso de Proveedores.
//!
//! Cada función valida la entrada, resuelve la regla de negocio y delega la
//! operación atómica en el `Store`. Devuelven DTO listos para serializar.


use std::sync::LazyLock;
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use tracing::{debug, instrument};
use crate::config::inventario::{MAX_LONGITUD_CLAVE, TOP_SEMILLAS};
use crate::database::domain::Store;
use crate::error::domain::{FieldError, InventoryError};
use crate::mapper::logic::{to_proveedor, to_proveedor_response, to_top2_response};
use crate::proveedor::domain::{Proveedor, ProveedorFiltro, ProveedorListParams, ProveedorRequest, ProveedorResponse};
use crate::semilla::domain::Top2SemillasResponse;


static SOLO_DIGITOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9]+$").expect("expresión regular de teléfono válida")
});


#[instrument(name = "crear_proveedor", skip(store, req), fields(nit = %req.nit))]
pub async fn create<S: Store>(store: &S, req: ProveedorRequest) -> Result<ProveedorResponse, InventoryError> {
    let proveedor = validar(req, Local::now().naive_local())?;
    let creado = store.crear_proveedor(proveedor).await?;
    debug!("Debug: proveedor creado");
    Ok(to_proveedor_response(creado))
}


#[instrument(name = "obtener_proveedor", skip(store))]
pub async fn get<S: Store>(store: &S, nit: &str) -> Result<ProveedorResponse, InventoryError> {
    store
        .obtener_proveedor(nit)
        .await?
        .map(to_proveedor_response)
        .ok_or_else(|| InventoryError::ProveedorNotFound(nit.to_string()))
}


/// Reemplaza todos los campos mutables del proveedor `nit`.
///
/// El NIT de la ruta y el del cuerpo deben coincidir; esa comprobación se hace
/// antes de consultar el almacén.
#[instrument(name = "actualizar_proveedor", skip(store, req))]
pub async fn update<S: Store>(store: &S,
                              nit: &str,
                              req: ProveedorRequest) -> Result<ProveedorResponse, InventoryError> {
    let proveedor = validar(req, Local::now().naive_local())?;

    if proveedor.nit != nit {
        return Err(InventoryError::InvalidArgument(
            "El NIT de la URL y del cuerpo no coinciden".to_string()
        ));
    }

    let actualizado = store.actualizar_proveedor(proveedor).await?;
    Ok(to_proveedor_response(actualizado))
}


#[instrument(name = "eliminar_proveedor", skip(store))]
pub async fn delete<S: Store>(store: &S, nit: &str) -> Result<(), InventoryError> {
    store.eliminar_proveedor(nit).await
}


#[instrument(name = "listar_proveedores", skip(store))]
pub async fn list<S: Store>(store: &S, params: ProveedorListParams) -> Result<Vec<ProveedorResponse>, InventoryError> {
    let filtro = resolver_filtro(params)?;
    debug!(?filtro, "Debug: filtro de proveedores resuelto");

    let proveedores = store.listar_proveedores(&filtro).await?;
    Ok(proveedores.into_iter().map(to_proveedor_response).collect())
}


/// Devuelve el proveedor y sus dos semillas más recientes.
#[instrument(name = "top2_semillas", skip(store))]
pub async fn top2<S: Store>(store: &S, nit: &str) -> Result<Top2SemillasResponse, InventoryError> {
    let proveedor = store
        .obtener_proveedor(nit)
        .await?
        .ok_or_else(|| InventoryError::ProveedorNotFound(nit.to_string()))?;

    let semillas = store.semillas_recientes_de_proveedor(nit, TOP_SEMILLAS).await?;
    Ok(to_top2_response(proveedor, semillas))
}


/// Aplica la precedencia de filtros: nombre, ciudad+activo, ciudad, activo, todos.
/// El primero que aplica descarta el resto.
pub fn resolver_filtro(params: ProveedorListParams) -> Result<ProveedorFiltro, InventoryError> {
    let nombre = params.nombre.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let ciudad = params.ciudad.map(|c| c.trim().to_string());

    if let Some(nombre) = nombre {
        return Ok(ProveedorFiltro::Nombre(nombre));
    }

    let activo = params.activo.as_deref().map(parse_activo).transpose()?;

    Ok(match (ciudad, activo) {
        (Some(ciudad), Some(activo)) => ProveedorFiltro::CiudadYActivo { ciudad, activo },
        (Some(ciudad), None) => ProveedorFiltro::Ciudad(ciudad),
        (None, Some(activo)) => ProveedorFiltro::Activo(activo),
        (None, None) => ProveedorFiltro::Todos,
    })
}


fn parse_activo(raw: &str) -> Result<bool, InventoryError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(InventoryError::field("activo", format!("'{raw}' no es un booleano (true/false)"))),
    }
}


/// Valida el request completo y, si no hay errores, lo convierte en registro.
///
/// Acumula todos los errores de campo en lugar de detenerse en el primero.
pub fn validar(req: ProveedorRequest, ahora: NaiveDateTime) -> Result<Proveedor, InventoryError> {
    let mut errores = Vec::new();

    let nit = req.nit.trim();
    if nit.is_empty() {
        errores.push(FieldError::new("nit", "El NIT es obligatorio"));
    } else if nit.chars().count() > MAX_LONGITUD_CLAVE {
        errores.push(FieldError::new("nit", format!("El NIT admite máximo {MAX_LONGITUD_CLAVE} caracteres")));
    }
    if req.nombre.trim().is_empty() {
        errores.push(FieldError::new("nombre", "El nombre es obligatorio"));
    }
    if req.ciudad.trim().is_empty() {
        errores.push(FieldError::new("ciudad", "La ciudad es obligatoria"));
    }
    if req.telefono.trim().is_empty() {
        errores.push(FieldError::new("telefono", "El teléfono es obligatorio"));
    } else if !SOLO_DIGITOS.is_match(&req.telefono) {
        errores.push(FieldError::new("telefono", "El teléfono debe contener solo dígitos"));
    }

    match req.fecha_registro {
        None => errores.push(FieldError::new("fechaRegistro", "La fecha de registro es obligatoria")),
        Some(f) if f > ahora => errores.push(FieldError::new("fechaRegistro", "La fecha de registro no puede ser futura")),
        Some(_) => {}
    }
    if req.activo.is_none() {
        errores.push(FieldError::new("activo", "El campo 'activo' es obligatorio"));
    }

    match (req.fecha_registro, req.activo) {
        (Some(fecha), Some(activo)) if errores.is_empty() => Ok(to_proveedor(req, fecha, activo)),
        _ => Err(InventoryError::Validation(errores)),
    }
}
