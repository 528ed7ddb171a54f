//! Almacén en memoria.
//!
//! Cada escritura toma el `RwLock` en modo exclusivo durante toda la secuencia
//! lectura-escritura, lo que da la misma atomicidad por operación que las
//! transacciones del repositorio PostgreSQL. Los mapas ordenados reproducen el
//! orden por clave de las consultas SQL.


use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::database::domain::Store;
use crate::error::domain::InventoryError;
use crate::proveedor::domain::{Proveedor, ProveedorFiltro};
use crate::semilla::domain::{Semilla, SemillaConsulta};


#[derive(Debug, Default)]
struct Inventario {
    proveedores: BTreeMap<String, Proveedor>,
    semillas: BTreeMap<String, Semilla>,
}


#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inventario>>,
}


impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}


impl Store for MemoryStore {

    async fn crear_proveedor(&self, proveedor: Proveedor) -> Result<Proveedor, InventoryError> {
        let mut inv = self.inner.write().await;
        if inv.proveedores.contains_key(&proveedor.nit) {
            return Err(InventoryError::ProveedorAlreadyExists(proveedor.nit));
        }
        inv.proveedores.insert(proveedor.nit.clone(), proveedor.clone());
        Ok(proveedor)
    }

    async fn obtener_proveedor(&self, nit: &str) -> Result<Option<Proveedor>, InventoryError> {
        Ok(self.inner.read().await.proveedores.get(nit).cloned())
    }

    async fn actualizar_proveedor(&self, proveedor: Proveedor) -> Result<Proveedor, InventoryError> {
        let mut inv = self.inner.write().await;
        match inv.proveedores.get_mut(&proveedor.nit) {
            Some(existente) => {
                *existente = proveedor.clone();
                Ok(proveedor)
            }
            None => Err(InventoryError::ProveedorNotFound(proveedor.nit)),
        }
    }

    async fn eliminar_proveedor(&self, nit: &str) -> Result<(), InventoryError> {
        let mut inv = self.inner.write().await;
        if !inv.proveedores.contains_key(nit) {
            return Err(InventoryError::ProveedorNotFound(nit.to_string()));
        }

        let asociadas = inv.semillas.values().filter(|s| s.proveedor_nit == nit).count();
        if asociadas > 0 {
            return Err(InventoryError::ConflictStorage(format!(
                "el proveedor '{nit}' tiene {asociadas} semilla(s) asociada(s)"
            )));
        }

        inv.proveedores.remove(nit);
        Ok(())
    }

    async fn listar_proveedores(&self, filtro: &ProveedorFiltro) -> Result<Vec<Proveedor>, InventoryError> {
        let inv = self.inner.read().await;
        let nombre_buscado = match filtro {
            ProveedorFiltro::Nombre(nombre) => nombre.to_lowercase(),
            _ => String::new(),
        };

        Ok(inv
            .proveedores
            .values()
            .filter(|p| match filtro {
                ProveedorFiltro::Nombre(_) => p.nombre.to_lowercase().contains(&nombre_buscado),
                ProveedorFiltro::CiudadYActivo { ciudad, activo } => p.ciudad == *ciudad && p.activo == *activo,
                ProveedorFiltro::Ciudad(ciudad) => p.ciudad == *ciudad,
                ProveedorFiltro::Activo(activo) => p.activo == *activo,
                ProveedorFiltro::Todos => true,
            })
            .cloned()
            .collect())
    }

    async fn crear_semilla(&self, semilla: Semilla) -> Result<Semilla, InventoryError> {
        let mut inv = self.inner.write().await;
        if inv.semillas.contains_key(&semilla.codigo) {
            return Err(InventoryError::SemillaAlreadyExists(semilla.codigo));
        }
        if !inv.proveedores.contains_key(&semilla.proveedor_nit) {
            return Err(InventoryError::ProveedorNotFound(semilla.proveedor_nit));
        }
        inv.semillas.insert(semilla.codigo.clone(), semilla.clone());
        Ok(semilla)
    }

    async fn obtener_semilla(&self, codigo: &str) -> Result<Option<Semilla>, InventoryError> {
        Ok(self.inner.read().await.semillas.get(codigo).cloned())
    }

    async fn actualizar_semilla(&self, semilla: Semilla) -> Result<Semilla, InventoryError> {
        let mut inv = self.inner.write().await;
        if !inv.semillas.contains_key(&semilla.codigo) {
            return Err(InventoryError::SemillaNotFound(semilla.codigo));
        }
        if !inv.proveedores.contains_key(&semilla.proveedor_nit) {
            return Err(InventoryError::ProveedorNotFound(semilla.proveedor_nit));
        }
        inv.semillas.insert(semilla.codigo.clone(), semilla.clone());
        Ok(semilla)
    }

    async fn eliminar_semilla(&self, codigo: &str) -> Result<(), InventoryError> {
        match self.inner.write().await.semillas.remove(codigo) {
            Some(_) => Ok(()),
            None => Err(InventoryError::SemillaNotFound(codigo.to_string())),
        }
    }

    async fn listar_semillas(&self, consulta: &SemillaConsulta) -> Result<Vec<Semilla>, InventoryError> {
        let inv = self.inner.read().await;
        let todas = inv.semillas.values();

        let semillas = match consulta {
            SemillaConsulta::Tipo(tipo) => todas.filter(|s| s.tipo_semilla == *tipo).cloned().collect(),
            SemillaConsulta::GerminacionDesde(min) => {
                let mut v: Vec<Semilla> = todas
                    .filter(|s| s.porcentaje_germinacion >= *min)
                    .cloned()
                    .collect();
                // sort estable: los empates conservan el orden por código
                v.sort_by(|a, b| {
                    b.porcentaje_germinacion
                        .partial_cmp(&a.porcentaje_germinacion)
                        .unwrap_or(Ordering::Equal)
                });
                v
            }
            SemillaConsulta::RangoFechas { desde, hasta } => {
                let mut v: Vec<Semilla> = todas
                    .filter(|s| s.fecha_ingreso >= *desde && s.fecha_ingreso <= *hasta)
                    .cloned()
                    .collect();
                v.sort_by(|a, b| b.fecha_ingreso.cmp(&a.fecha_ingreso));
                v
            }
            SemillaConsulta::Combinada(_) => todas.cloned().collect(),
        };

        Ok(semillas)
    }

    async fn semillas_recientes_de_proveedor(&self, nit: &str, limite: i64) -> Result<Vec<Semilla>, InventoryError> {
        let inv = self.inner.read().await;
        let mut v: Vec<Semilla> = inv
            .semillas
            .values()
            .filter(|s| s.proveedor_nit == nit)
            .cloned()
            .collect();
        v.sort_by(|a, b| b.fecha_ingreso.cmp(&a.fecha_ingreso));
        v.truncate(usize::try_from(limite).unwrap_or(0));
        Ok(v)
    }
}
