//! Conversión entre DTO de la API y registros almacenados.
//!
//! Es el único lugar donde las fechas cruzan la frontera texto/`NaiveDateTime`.
//! Los registros (`Proveedor`, `Semilla`) no conocen el formato de la API.


use chrono::NaiveDateTime;
use crate::config::inventario::FORMATO_FECHA;
use crate::proveedor::domain::{Proveedor, ProveedorRequest, ProveedorResponse};
use crate::semilla::domain::{Semilla, SemillaRequest, SemillaResponse, Top2SemillasResponse};


pub fn parse_fecha(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), FORMATO_FECHA)
}


pub fn format_fecha(fecha: &NaiveDateTime) -> String {
    fecha.format(FORMATO_FECHA).to_string()
}


/// Construye el registro a partir de un request ya validado.
pub fn to_proveedor(req: ProveedorRequest,
                    fecha_registro: NaiveDateTime,
                    activo: bool) -> Proveedor {
    Proveedor {
        nit: req.nit.trim().to_string(),
        nombre: req.nombre,
        ciudad: req.ciudad,
        telefono: req.telefono,
        fecha_registro,
        activo,
    }
}


pub fn to_proveedor_response(p: Proveedor) -> ProveedorResponse {
    ProveedorResponse {
        fecha_registro: format_fecha(&p.fecha_registro),
        nit: p.nit,
        nombre: p.nombre,
        ciudad: p.ciudad,
        telefono: p.telefono,
        activo: p.activo,
    }
}


/// Construye el registro a partir de un request ya validado.
pub fn to_semilla(req: SemillaRequest, fecha_ingreso: NaiveDateTime) -> Semilla {
    Semilla {
        codigo: req.codigo.trim().to_string(),
        nombre: req.nombre,
        precio: req.precio,
        stock: req.stock,
        tipo_semilla: req.tipo_semilla,
        porcentaje_germinacion: req.porcentaje_germinacion,
        fecha_ingreso,
        proveedor_nit: req.proveedor_nit.trim().to_string(),
    }
}


pub fn to_semilla_response(s: Semilla) -> SemillaResponse {
    SemillaResponse {
        fecha_ingreso: format_fecha(&s.fecha_ingreso),
        codigo: s.codigo,
        nombre: s.nombre,
        precio: s.precio,
        stock: s.stock,
        tipo_semilla: s.tipo_semilla,
        porcentaje_germinacion: s.porcentaje_germinacion,
        proveedor_nit: s.proveedor_nit,
    }
}


pub fn to_top2_response(proveedor: Proveedor, semillas: Vec<Semilla>) -> Top2SemillasResponse {
    Top2SemillasResponse {
        proveedor: to_proveedor_response(proveedor),
        semillas: semillas.into_iter().map(to_semilla_response).collect(),
    }
}


/// Deserialización serde de `Option<NaiveDateTime>` con el formato de la API.
///
/// Un texto con otro formato hace fallar la lectura del cuerpo completo.
pub mod fecha_opcional {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};
    use super::parse_fecha;
    use crate::config::inventario::FORMATO_FECHA_LEGIBLE;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_fecha(&s).map(Some).map_err(|e| {
                serde::de::Error::custom(format!(
                    "fecha '{s}' inválida ({e}); formato esperado {FORMATO_FECHA_LEGIBLE}"
                ))
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fecha(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn fecha_uses_seconds_even_when_zero() {
        assert_eq!(format_fecha(&fecha(8)), "2024-03-15T08:00:00");
        assert_eq!(parse_fecha("2024-03-15T08:00:00").unwrap(), fecha(8));
    }

    #[test]
    fn fecha_rejects_other_layouts() {
        assert!(parse_fecha("2024-03-15 08:00:00").is_err());
        assert!(parse_fecha("15/03/2024").is_err());
        assert!(parse_fecha("2024-03-15").is_err());
    }

    #[test]
    fn proveedor_request_maps_to_response_without_loss() {
        let req = ProveedorRequest {
            nit: " 900123456 ".into(),
            nombre: "Agro Andes".into(),
            ciudad: "Ibagué".into(),
            telefono: "3001234567".into(),
            fecha_registro: Some(fecha(10)),
            activo: Some(true),
        };

        let entidad = to_proveedor(req, fecha(10), true);
        let resp = to_proveedor_response(entidad);

        assert_eq!(resp.nit, "900123456");
        assert_eq!(resp.nombre, "Agro Andes");
        assert_eq!(resp.ciudad, "Ibagué");
        assert_eq!(resp.telefono, "3001234567");
        assert_eq!(resp.fecha_registro, "2024-03-15T10:00:00");
        assert!(resp.activo);
    }

    #[test]
    fn semilla_response_uses_camel_case_on_the_wire() {
        let s = Semilla {
            codigo: "S001".into(),
            nombre: "Maíz amarillo".into(),
            precio: 12500.0,
            stock: 40,
            tipo_semilla: "Maíz".into(),
            porcentaje_germinacion: 92.5,
            fecha_ingreso: fecha(9),
            proveedor_nit: "900123456".into(),
        };

        let json = serde_json::to_value(to_semilla_response(s)).unwrap();

        assert_eq!(json["tipoSemilla"], "Maíz");
        assert_eq!(json["porcentajeGerminacion"], 92.5);
        assert_eq!(json["proveedorNit"], "900123456");
        assert_eq!(json["fechaIngreso"], "2024-03-15T09:00:00");
    }

    #[test]
    fn request_with_bad_date_fails_to_deserialize() {
        let body = r#"{"codigo":"S1","fechaIngreso":"2024/01/01"}"#;
        let err = serde_json::from_str::<SemillaRequest>(body).unwrap_err();
        assert!(err.to_string().contains("yyyy-MM-dd'T'HH:mm:ss"));
    }

    #[test]
    fn request_without_date_deserializes_as_none() {
        let req: SemillaRequest = serde_json::from_str(r#"{"codigo":"S1"}"#).unwrap();
        assert_eq!(req.fecha_ingreso, None);
        assert_eq!(req.stock, 0);
    }
}
