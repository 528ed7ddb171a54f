//! Casos de uso de Semillas.


use chrono::{Local, NaiveDateTime};
use tracing::{debug, instrument};
use crate::config::inventario::{FORMATO_FECHA_LEGIBLE, MAX_LONGITUD_CLAVE};
use crate::database::domain::Store;
use crate::error::domain::{FieldError, InventoryError};
use crate::mapper::logic::{parse_fecha, to_semilla, to_semilla_response};
use crate::semilla::domain::{Semilla, SemillaConsulta, SemillaCriterios, SemillaListParams, SemillaRequest, SemillaResponse};


#[instrument(name = "crear_semilla", skip(store, req), fields(codigo = %req.codigo))]
pub async fn create<S: Store>(store: &S, req: SemillaRequest) -> Result<SemillaResponse, InventoryError> {
    let semilla = validar(req, Local::now().naive_local())?;
    let creada = store.crear_semilla(semilla).await?;
    debug!("Debug: semilla creada");
    Ok(to_semilla_response(creada))
}


#[instrument(name = "obtener_semilla", skip(store))]
pub async fn get<S: Store>(store: &S, codigo: &str) -> Result<SemillaResponse, InventoryError> {
    store
        .obtener_semilla(codigo)
        .await?
        .map(to_semilla_response)
        .ok_or_else(|| InventoryError::SemillaNotFound(codigo.to_string()))
}


#[instrument(name = "actualizar_semilla", skip(store, req))]
pub async fn update<S: Store>(store: &S,
                              codigo: &str,
                              req: SemillaRequest) -> Result<SemillaResponse, InventoryError> {
    let semilla = validar(req, Local::now().naive_local())?;

    if semilla.codigo != codigo {
        return Err(InventoryError::InvalidArgument(
            "El código de la URL y del cuerpo no coinciden".to_string()
        ));
    }

    let actualizada = store.actualizar_semilla(semilla).await?;
    Ok(to_semilla_response(actualizada))
}


#[instrument(name = "eliminar_semilla", skip(store))]
pub async fn delete<S: Store>(store: &S, codigo: &str) -> Result<(), InventoryError> {
    store.eliminar_semilla(codigo).await
}


/// Lista semillas según la precedencia de filtros de `resolver_consulta`.
///
/// Para `SemillaConsulta::Combinada` el almacén devuelve todo y aquí se aplican
/// los filtros presentes con AND.
#[instrument(name = "listar_semillas", skip(store))]
pub async fn list<S: Store>(store: &S, params: SemillaListParams) -> Result<Vec<SemillaResponse>, InventoryError> {
    let consulta = resolver_consulta(parse_criterios(params)?);
    debug!(?consulta, "Debug: consulta de semillas resuelta");

    let mut semillas = store.listar_semillas(&consulta).await?;
    if let SemillaConsulta::Combinada(criterios) = &consulta {
        semillas.retain(|s| cumple(s, criterios));
    }

    Ok(semillas.into_iter().map(to_semilla_response).collect())
}


/// Interpreta los parámetros de texto. Un valor que no se puede leer es un
/// error de validación, nunca un filtro ignorado.
pub fn parse_criterios(params: SemillaListParams) -> Result<SemillaCriterios, InventoryError> {
    let mut errores = Vec::new();

    let tipo = params.tipo.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    let germinacion_min = match params.germinacion_min.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                errores.push(FieldError::new("germinacionMin", format!("'{raw}' no es un número")));
                None
            }
        },
    };

    let mut fecha = |campo: &str, raw: Option<String>| match raw.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(valor) => match parse_fecha(valor) {
            Ok(f) => Some(f),
            Err(_) => {
                errores.push(FieldError::new(
                    campo,
                    format!("'{valor}' no es una fecha válida; formato esperado {FORMATO_FECHA_LEGIBLE}"),
                ));
                None
            }
        },
    };
    let desde = fecha("desde", params.desde);
    let hasta = fecha("hasta", params.hasta);

    if !errores.is_empty() {
        return Err(InventoryError::Validation(errores));
    }

    Ok(SemillaCriterios { tipo, germinacion_min, desde, hasta })
}


/// Elige la consulta: sólo tipo, sólo germinación mínima, sólo rango completo
/// de fechas, o en cualquier otro caso la combinación AND en memoria.
pub fn resolver_consulta(c: SemillaCriterios) -> SemillaConsulta {
    match c {
        SemillaCriterios { tipo: Some(tipo), germinacion_min: None, desde: None, hasta: None } => {
            SemillaConsulta::Tipo(tipo)
        }
        SemillaCriterios { tipo: None, germinacion_min: Some(min), desde: None, hasta: None } => {
            SemillaConsulta::GerminacionDesde(min)
        }
        SemillaCriterios { tipo: None, germinacion_min: None, desde: Some(desde), hasta: Some(hasta) } => {
            SemillaConsulta::RangoFechas { desde, hasta }
        }
        otro => SemillaConsulta::Combinada(otro),
    }
}


fn cumple(s: &Semilla, c: &SemillaCriterios) -> bool {
    c.tipo.as_ref().is_none_or(|t| s.tipo_semilla == *t)
        && c.germinacion_min.is_none_or(|min| s.porcentaje_germinacion >= min)
        && c.desde.is_none_or(|d| s.fecha_ingreso >= d)
        && c.hasta.is_none_or(|h| s.fecha_ingreso <= h)
}


/// Valida el request completo y, si no hay errores, lo convierte en registro.
pub fn validar(req: SemillaRequest, ahora: NaiveDateTime) -> Result<Semilla, InventoryError> {
    let mut errores = Vec::new();

    let codigo = req.codigo.trim();
    if codigo.is_empty() {
        errores.push(FieldError::new("codigo", "El código es obligatorio"));
    } else if codigo.chars().count() > MAX_LONGITUD_CLAVE {
        errores.push(FieldError::new("codigo", format!("El código admite máximo {MAX_LONGITUD_CLAVE} caracteres")));
    }
    if req.nombre.trim().is_empty() {
        errores.push(FieldError::new("nombre", "El nombre es obligatorio"));
    }
    if !(req.precio.is_finite() && req.precio >= 0.0) {
        errores.push(FieldError::new("precio", "El precio debe ser mayor o igual a 0"));
    }
    if req.stock < 0 {
        errores.push(FieldError::new("stock", "El stock debe ser mayor o igual a 0"));
    }
    if req.tipo_semilla.trim().is_empty() {
        errores.push(FieldError::new("tipoSemilla", "El tipo de semilla es obligatorio"));
    }
    if !(0.0..=100.0).contains(&req.porcentaje_germinacion) {
        errores.push(FieldError::new("porcentajeGerminacion", "El porcentaje de germinación debe estar entre 0 y 100"));
    }
    if req.proveedor_nit.trim().is_empty() {
        errores.push(FieldError::new("proveedorNit", "El NIT del proveedor es obligatorio"));
    }

    match req.fecha_ingreso {
        None => errores.push(FieldError::new("fechaIngreso", "La fecha de ingreso es obligatoria")),
        Some(f) if f > ahora => errores.push(FieldError::new("fechaIngreso", "La fecha de ingreso no puede ser futura")),
        Some(_) => {}
    }

    match req.fecha_ingreso {
        Some(fecha) if errores.is_empty() => Ok(to_semilla(req, fecha)),
        _ => Err(InventoryError::Validation(errores)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::database::memory::MemoryStore;
    use crate::proveedor::domain::ProveedorRequest;
    use crate::proveedor::logic as proveedores;

    fn fecha(dia: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, dia)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    fn request(codigo: &str, tipo: &str, germinacion: f64, dia: u32) -> SemillaRequest {
        SemillaRequest {
            codigo: codigo.into(),
            nombre: format!("Lote {codigo}"),
            precio: 15000.0,
            stock: 25,
            tipo_semilla: tipo.into(),
            porcentaje_germinacion: germinacion,
            proveedor_nit: "900123456".into(),
            fecha_ingreso: Some(fecha(dia)),
        }
    }

    fn params(tipo: Option<&str>, min: Option<&str>, desde: Option<&str>, hasta: Option<&str>) -> SemillaListParams {
        SemillaListParams {
            tipo: tipo.map(str::to_string),
            germinacion_min: min.map(str::to_string),
            desde: desde.map(str::to_string),
            hasta: hasta.map(str::to_string),
        }
    }

    async fn store_con_proveedor() -> MemoryStore {
        let store = MemoryStore::new();
        proveedores::create(&store, ProveedorRequest {
            nit: "900123456".into(),
            nombre: "Semillas del Tolima".into(),
            ciudad: "Ibagué".into(),
            telefono: "3001112233".into(),
            fecha_registro: Some(fecha(1)),
            activo: Some(true),
        })
        .await
        .unwrap();
        store
    }

    fn codigos(v: &[SemillaResponse]) -> Vec<&str> {
        v.iter().map(|s| s.codigo.as_str()).collect()
    }

    #[tokio::test]
    async fn germinacion_min_scenario() {
        let store = store_con_proveedor().await;
        create(&store, request("S001", "Maíz", 92.5, 3)).await.unwrap();

        let v = list(&store, params(None, Some("90"), None, None)).await.unwrap();
        assert_eq!(codigos(&v), ["S001"]);

        let v = list(&store, params(None, Some("95"), None, None)).await.unwrap();
        assert!(v.is_empty());
    }

    #[tokio::test]
    async fn unknown_proveedor_is_not_persisted() {
        let store = store_con_proveedor().await;
        let mut req = request("S9", "Frijol", 80.0, 2);
        req.proveedor_nit = "111".into();

        let err = create(&store, req).await.unwrap_err();
        assert!(matches!(err, InventoryError::ProveedorNotFound(nit) if nit == "111"));
        assert!(matches!(get(&store, "S9").await.unwrap_err(), InventoryError::SemillaNotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_codigo_wins_over_missing_proveedor() {
        let store = store_con_proveedor().await;
        create(&store, request("S1", "Maíz", 90.0, 2)).await.unwrap();

        let mut req = request("S1", "Maíz", 90.0, 2);
        req.proveedor_nit = "no-existe".into();
        let err = create(&store, req).await.unwrap_err();
        assert!(matches!(err, InventoryError::SemillaAlreadyExists(_)));
    }

    #[tokio::test]
    async fn update_checks_key_then_existence_then_proveedor() {
        let store = store_con_proveedor().await;
        create(&store, request("S1", "Maíz", 90.0, 2)).await.unwrap();

        let err = update(&store, "S1", request("S2", "Maíz", 90.0, 2)).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));

        let err = update(&store, "S3", request("S3", "Maíz", 90.0, 2)).await.unwrap_err();
        assert!(matches!(err, InventoryError::SemillaNotFound(_)));

        let mut req = request("S1", "Maíz", 90.0, 2);
        req.proveedor_nit = "404".into();
        let err = update(&store, "S1", req).await.unwrap_err();
        assert!(matches!(err, InventoryError::ProveedorNotFound(_)));

        let actualizada = update(&store, "S1", request("S1", "Arroz", 75.0, 4)).await.unwrap();
        assert_eq!(actualizada.tipo_semilla, "Arroz");
        assert_eq!(actualizada.fecha_ingreso, "2024-04-04T07:00:00");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = store_con_proveedor().await;
        create(&store, request("S1", "Maíz", 90.0, 2)).await.unwrap();
        delete(&store, "S1").await.unwrap();

        assert!(matches!(get(&store, "S1").await.unwrap_err(), InventoryError::SemillaNotFound(_)));
        assert!(matches!(delete(&store, "S1").await.unwrap_err(), InventoryError::SemillaNotFound(_)));
    }

    #[tokio::test]
    async fn date_range_is_inclusive_and_descending() {
        let store = store_con_proveedor().await;
        create(&store, request("S1", "Maíz", 90.0, 2)).await.unwrap();
        create(&store, request("S2", "Maíz", 90.0, 5)).await.unwrap();
        create(&store, request("S3", "Maíz", 90.0, 9)).await.unwrap();

        let v = list(&store, params(None, None, Some("2024-04-02T07:00:00"), Some("2024-04-05T07:00:00")))
            .await
            .unwrap();
        assert_eq!(codigos(&v), ["S2", "S1"]);
    }

    #[tokio::test]
    async fn combined_filters_are_anded() {
        let store = store_con_proveedor().await;
        create(&store, request("S1", "Maíz", 95.0, 2)).await.unwrap();
        create(&store, request("S2", "Maíz", 60.0, 3)).await.unwrap();
        create(&store, request("S3", "Arroz", 97.0, 4)).await.unwrap();

        let v = list(&store, params(Some("Maíz"), Some("90"), None, None)).await.unwrap();
        assert_eq!(codigos(&v), ["S1"]);

        let v = list(&store, params(None, None, Some("2024-04-03T00:00:00"), None)).await.unwrap();
        assert_eq!(codigos(&v), ["S2", "S3"]);

        let v = list(&store, params(Some("Maíz"), None, None, None)).await.unwrap();
        assert_eq!(codigos(&v), ["S1", "S2"]);

        assert_eq!(list(&store, params(None, None, None, None)).await.unwrap().len(), 3);
    }

    #[test]
    fn consulta_precedence() {
        let c = |tipo: Option<&str>, min: Option<f64>, d: Option<u32>, h: Option<u32>| SemillaCriterios {
            tipo: tipo.map(str::to_string),
            germinacion_min: min,
            desde: d.map(fecha),
            hasta: h.map(fecha),
        };

        assert_eq!(resolver_consulta(c(Some("Maíz"), None, None, None)), SemillaConsulta::Tipo("Maíz".into()));
        assert_eq!(resolver_consulta(c(None, Some(90.0), None, None)), SemillaConsulta::GerminacionDesde(90.0));
        assert_eq!(
            resolver_consulta(c(None, None, Some(1), Some(2))),
            SemillaConsulta::RangoFechas { desde: fecha(1), hasta: fecha(2) }
        );
        assert!(matches!(resolver_consulta(c(Some("Maíz"), None, Some(1), None)), SemillaConsulta::Combinada(_)));
        assert!(matches!(resolver_consulta(c(None, Some(1.0), Some(1), Some(2))), SemillaConsulta::Combinada(_)));
        assert!(matches!(resolver_consulta(c(None, None, None, None)), SemillaConsulta::Combinada(_)));
    }

    #[test]
    fn tipo_filter_is_trimmed() {
        let criterios = parse_criterios(params(Some(" Maíz "), None, None, None)).unwrap();
        assert_eq!(resolver_consulta(criterios), SemillaConsulta::Tipo("Maíz".into()));

        let criterios = parse_criterios(params(Some("   "), None, None, None)).unwrap();
        assert_eq!(criterios, SemillaCriterios::default());
    }

    #[test]
    fn unreadable_filters_are_validation_errors() {
        let err = parse_criterios(params(None, Some("alto"), Some("ayer"), None)).unwrap_err();
        match err {
            InventoryError::Validation(errores) => {
                let campos: Vec<_> = errores.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(campos, ["germinacionMin", "desde"]);
            }
            other => panic!("se esperaba Validation, llegó {other:?}"),
        }
    }

    #[test]
    fn out_of_range_values_are_rejected_before_persistence() {
        let mut req = request("S1", "Maíz", 100.5, 2);
        req.precio = -1.0;
        req.stock = -3;

        match validar(req, fecha(20)).unwrap_err() {
            InventoryError::Validation(errores) => {
                let campos: Vec<_> = errores.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(campos, ["precio", "stock", "porcentajeGerminacion"]);
            }
            other => panic!("se esperaba Validation, llegó {other:?}"),
        }
    }

    #[test]
    fn germinacion_bounds_are_inclusive() {
        assert!(validar(request("S1", "Maíz", 0.0, 2), fecha(20)).is_ok());
        assert!(validar(request("S1", "Maíz", 100.0, 2), fecha(20)).is_ok());
    }
}
