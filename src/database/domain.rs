//! Puerto de persistencia del inventario.
//!
//! `Store` agrupa las operaciones atómicas que necesitan los casos de uso.
//! Cada operación de escritura resuelve su lectura previa (existencia, proveedor
//! referenciado) dentro de la misma unidad atómica del backend, de modo que dos
//! peticiones concurrentes sobre la misma clave no pueden duplicarla ni perderla.


use std::future::Future;
use crate::error::domain::InventoryError;
use crate::proveedor::domain::{Proveedor, ProveedorFiltro};
use crate::semilla::domain::{Semilla, SemillaConsulta};


pub trait Store: Clone + Send + Sync + 'static {
    /// Inserta un proveedor nuevo.
    ///
    /// # Errores
    /// * `ProveedorAlreadyExists` si el NIT ya está registrado.
    fn crear_proveedor(
        &self,
        proveedor: Proveedor,
    ) -> impl Future<Output = Result<Proveedor, InventoryError>> + Send;

    fn obtener_proveedor(
        &self,
        nit: &str,
    ) -> impl Future<Output = Result<Option<Proveedor>, InventoryError>> + Send;

    /// Reemplaza todos los campos salvo el NIT.
    ///
    /// # Errores
    /// * `ProveedorNotFound` si el NIT no existe.
    fn actualizar_proveedor(
        &self,
        proveedor: Proveedor,
    ) -> impl Future<Output = Result<Proveedor, InventoryError>> + Send;

    /// Elimina un proveedor sin semillas asociadas.
    ///
    /// # Errores
    /// * `ProveedorNotFound` si el NIT no existe.
    /// * `ConflictStorage` si alguna semilla lo referencia.
    fn eliminar_proveedor(
        &self,
        nit: &str,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send;

    fn listar_proveedores(
        &self,
        filtro: &ProveedorFiltro,
    ) -> impl Future<Output = Result<Vec<Proveedor>, InventoryError>> + Send;

    /// Inserta una semilla nueva.
    ///
    /// # Errores
    /// * `SemillaAlreadyExists` si el código ya está registrado.
    /// * `ProveedorNotFound` si `proveedor_nit` no existe.
    fn crear_semilla(
        &self,
        semilla: Semilla,
    ) -> impl Future<Output = Result<Semilla, InventoryError>> + Send;

    fn obtener_semilla(
        &self,
        codigo: &str,
    ) -> impl Future<Output = Result<Option<Semilla>, InventoryError>> + Send;

    /// Reemplaza todos los campos salvo el código, incluido el proveedor.
    ///
    /// # Errores
    /// * `SemillaNotFound` si el código no existe.
    /// * `ProveedorNotFound` si el nuevo `proveedor_nit` no existe.
    fn actualizar_semilla(
        &self,
        semilla: Semilla,
    ) -> impl Future<Output = Result<Semilla, InventoryError>> + Send;

    fn eliminar_semilla(
        &self,
        codigo: &str,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send;

    /// Ejecuta una de las consultas directas de `SemillaConsulta`.
    ///
    /// `SemillaConsulta::Combinada` devuelve todas las semillas ordenadas por
    /// código; el filtrado de ese caso lo hace el caso de uso.
    fn listar_semillas(
        &self,
        consulta: &SemillaConsulta,
    ) -> impl Future<Output = Result<Vec<Semilla>, InventoryError>> + Send;

    /// Semillas de un proveedor de la más reciente a la más antigua, con
    /// empates resueltos por código ascendente.
    fn semillas_recientes_de_proveedor(
        &self,
        nit: &str,
        limite: i64,
    ) -> impl Future<Output = Result<Vec<Semilla>, InventoryError>> + Send;
}
