//! Módulo de persistencia para Proveedores.
//!
//! Tabla `proveedores`, con clave natural `nit`. Las restricciones CHECK replican
//! las reglas de validación de la API para que el almacén tampoco acepte datos
//! fuera de rango si alguien escribe directamente en la base.


use sqlx::{Executor, PgPool};
use sqlx::postgres::PgExecutor;
use crate::proveedor::domain::{Proveedor, ProveedorFiltro};


pub async fn create_table_proveedores(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS proveedores (
            nit                  VARCHAR(20) PRIMARY KEY,
            nombre               TEXT NOT NULL,
            ciudad               TEXT NOT NULL,
            telefono             TEXT NOT NULL CHECK (telefono ~ '^[0-9]+$'),
            fecha_registro       TIMESTAMP NOT NULL,
            activo               BOOLEAN NOT NULL
        );
        "#
    )
        .await?;

    Ok(())
}


/// Inserta el proveedor si el NIT está libre. `None` indica clave duplicada.
pub async fn insert_proveedor<'e, E>(executor: E,
                                     p: &Proveedor
) -> Result<Option<Proveedor>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Proveedor>(
        "INSERT INTO proveedores (nit, nombre, ciudad, telefono, fecha_registro, activo)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (nit) DO NOTHING
         RETURNING nit, nombre, ciudad, telefono, fecha_registro, activo"
    )
        .bind(&p.nit)
        .bind(&p.nombre)
        .bind(&p.ciudad)
        .bind(&p.telefono)
        .bind(p.fecha_registro)
        .bind(p.activo)
        .fetch_optional(executor)
        .await
}


pub async fn select_proveedor<'e, E>(executor: E, nit: &str) -> Result<Option<Proveedor>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Proveedor>(
        "SELECT nit, nombre, ciudad, telefono, fecha_registro, activo
         FROM proveedores WHERE nit = $1"
    )
        .bind(nit)
        .fetch_optional(executor)
        .await
}


/// Bloquea la fila para que no pueda borrarse mientras dura la transacción.
pub async fn lock_proveedor_for_share<'e, E>(executor: E, nit: &str) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT nit FROM proveedores WHERE nit = $1 FOR SHARE"
    )
        .bind(nit)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}


pub async fn lock_proveedor_for_update<'e, E>(executor: E, nit: &str) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT nit FROM proveedores WHERE nit = $1 FOR UPDATE"
    )
        .bind(nit)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}


/// Reemplaza los campos mutables. `None` si el NIT no existe.
pub async fn update_proveedor<'e, E>(executor: E,
                                     p: &Proveedor
) -> Result<Option<Proveedor>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Proveedor>(
        "UPDATE proveedores
         SET nombre = $2, ciudad = $3, telefono = $4, fecha_registro = $5, activo = $6
         WHERE nit = $1
         RETURNING nit, nombre, ciudad, telefono, fecha_registro, activo"
    )
        .bind(&p.nit)
        .bind(&p.nombre)
        .bind(&p.ciudad)
        .bind(&p.telefono)
        .bind(p.fecha_registro)
        .bind(p.activo)
        .fetch_optional(executor)
        .await
}


pub async fn delete_proveedor<'e, E>(executor: E, nit: &str) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM proveedores WHERE nit = $1")
        .bind(nit)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}


pub async fn select_proveedores(pool: &PgPool,
                                filtro: &ProveedorFiltro
) -> Result<Vec<Proveedor>, sqlx::Error> {

    const COLUMNS: &str = "SELECT nit, nombre, ciudad, telefono, fecha_registro, activo FROM proveedores";

    let proveedores = match filtro {
        ProveedorFiltro::Nombre(nombre) => {
            sqlx::query_as::<_, Proveedor>(&format!(
                "{COLUMNS} WHERE POSITION(LOWER($1) IN LOWER(nombre)) > 0 ORDER BY nit"
            ))
                .bind(nombre)
                .fetch_all(pool)
                .await?
        }
        ProveedorFiltro::CiudadYActivo { ciudad, activo } => {
            sqlx::query_as::<_, Proveedor>(&format!(
                "{COLUMNS} WHERE ciudad = $1 AND activo = $2 ORDER BY nit"
            ))
                .bind(ciudad)
                .bind(*activo)
                .fetch_all(pool)
                .await?
        }
        ProveedorFiltro::Ciudad(ciudad) => {
            sqlx::query_as::<_, Proveedor>(&format!("{COLUMNS} WHERE ciudad = $1 ORDER BY nit"))
                .bind(ciudad)
                .fetch_all(pool)
                .await?
        }
        ProveedorFiltro::Activo(activo) => {
            sqlx::query_as::<_, Proveedor>(&format!("{COLUMNS} WHERE activo = $1 ORDER BY nit"))
                .bind(*activo)
                .fetch_all(pool)
                .await?
        }
        ProveedorFiltro::Todos => {
            sqlx::query_as::<_, Proveedor>(&format!("{COLUMNS} ORDER BY nit"))
                .fetch_all(pool)
                .await?
        }
    };

    Ok(proveedores)
}
