use chrono::NaiveDateTime;
use sqlx::{Executor, PgPool};
use sqlx::postgres::PgExecutor;
use crate::semilla::domain::{Semilla, SemillaConsulta};


const COLUMNS: &str = "SELECT codigo, nombre, precio, stock, tipo_semilla, porcentaje_germinacion,
                              fecha_ingreso, proveedor_nit
                       FROM semillas";


/// Crea la tabla `semillas` y el índice por proveedor.
///
/// La FK hacia `proveedores` no tiene `ON DELETE CASCADE`: un proveedor con lotes
/// no puede eliminarse.
pub async fn create_table_semillas(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS semillas (
            codigo                  VARCHAR(20) PRIMARY KEY,
            nombre                  TEXT NOT NULL,
            precio                  DOUBLE PRECISION NOT NULL CHECK (precio >= 0),
            stock                   INTEGER NOT NULL CHECK (stock >= 0),
            tipo_semilla            TEXT NOT NULL,
            porcentaje_germinacion  DOUBLE PRECISION NOT NULL
                                    CHECK (porcentaje_germinacion BETWEEN 0 AND 100),
            fecha_ingreso           TIMESTAMP NOT NULL,
            proveedor_nit           VARCHAR(20) NOT NULL REFERENCES proveedores (nit)
        );
        "#
    )
        .await?;

    pool.execute(
        "CREATE INDEX IF NOT EXISTS idx_semillas_proveedor_nit ON semillas (proveedor_nit)"
    )
        .await?;

    Ok(())
}


pub async fn exists_semilla<'e, E>(executor: E, codigo: &str) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM semillas WHERE codigo = $1)"
    )
        .bind(codigo)
        .fetch_one(executor)
        .await?;

    Ok(exists)
}


pub async fn lock_semilla_for_update<'e, E>(executor: E, codigo: &str) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT codigo FROM semillas WHERE codigo = $1 FOR UPDATE"
    )
        .bind(codigo)
        .fetch_optional(executor)
        .await?;

    Ok(row.is_some())
}


pub async fn count_semillas_de_proveedor<'e, E>(executor: E, nit: &str) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM semillas WHERE proveedor_nit = $1"
    )
        .bind(nit)
        .fetch_one(executor)
        .await?;

    Ok(count)
}


/// Inserta la semilla si el código está libre. `None` indica clave duplicada.
pub async fn insert_semilla<'e, E>(executor: E,
                                   s: &Semilla
) -> Result<Option<Semilla>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Semilla>(
        "INSERT INTO semillas (
            codigo, nombre, precio, stock, tipo_semilla,
            porcentaje_germinacion, fecha_ingreso, proveedor_nit
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (codigo) DO NOTHING
         RETURNING codigo, nombre, precio, stock, tipo_semilla,
                   porcentaje_germinacion, fecha_ingreso, proveedor_nit"
    )
        .bind(&s.codigo)
        .bind(&s.nombre)
        .bind(s.precio)
        .bind(s.stock)
        .bind(&s.tipo_semilla)
        .bind(s.porcentaje_germinacion)
        .bind(s.fecha_ingreso)
        .bind(&s.proveedor_nit)
        .fetch_optional(executor)
        .await
}


pub async fn update_semilla<'e, E>(executor: E,
                                   s: &Semilla
) -> Result<Option<Semilla>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Semilla>(
        "UPDATE semillas
         SET nombre = $2, precio = $3, stock = $4, tipo_semilla = $5,
             porcentaje_germinacion = $6, fecha_ingreso = $7, proveedor_nit = $8
         WHERE codigo = $1
         RETURNING codigo, nombre, precio, stock, tipo_semilla,
                   porcentaje_germinacion, fecha_ingreso, proveedor_nit"
    )
        .bind(&s.codigo)
        .bind(&s.nombre)
        .bind(s.precio)
        .bind(s.stock)
        .bind(&s.tipo_semilla)
        .bind(s.porcentaje_germinacion)
        .bind(s.fecha_ingreso)
        .bind(&s.proveedor_nit)
        .fetch_optional(executor)
        .await
}


pub async fn select_semilla<'e, E>(executor: E, codigo: &str) -> Result<Option<Semilla>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Semilla>(&format!("{COLUMNS} WHERE codigo = $1"))
        .bind(codigo)
        .fetch_optional(executor)
        .await
}


pub async fn delete_semilla<'e, E>(executor: E, codigo: &str) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM semillas WHERE codigo = $1")
        .bind(codigo)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}


pub async fn select_semillas(pool: &PgPool,
                             consulta: &SemillaConsulta
) -> Result<Vec<Semilla>, sqlx::Error> {

    match consulta {
        SemillaConsulta::Tipo(tipo) => {
            sqlx::query_as::<_, Semilla>(&format!(
                "{COLUMNS} WHERE tipo_semilla = $1 ORDER BY codigo"
            ))
                .bind(tipo)
                .fetch_all(pool)
                .await
        }
        SemillaConsulta::GerminacionDesde(min) => {
            sqlx::query_as::<_, Semilla>(&format!(
                "{COLUMNS} WHERE porcentaje_germinacion >= $1
                 ORDER BY porcentaje_germinacion DESC, codigo"
            ))
                .bind(*min)
                .fetch_all(pool)
                .await
        }
        SemillaConsulta::RangoFechas { desde, hasta } => {
            select_semillas_en_rango(pool, *desde, *hasta).await
        }
        SemillaConsulta::Combinada(_) => {
            sqlx::query_as::<_, Semilla>(&format!("{COLUMNS} ORDER BY codigo"))
                .fetch_all(pool)
                .await
        }
    }
}


async fn select_semillas_en_rango(pool: &PgPool,
                                  desde: NaiveDateTime,
                                  hasta: NaiveDateTime
) -> Result<Vec<Semilla>, sqlx::Error> {
    sqlx::query_as::<_, Semilla>(&format!(
        "{COLUMNS} WHERE fecha_ingreso BETWEEN $1 AND $2
         ORDER BY fecha_ingreso DESC, codigo"
    ))
        .bind(desde)
        .bind(hasta)
        .fetch_all(pool)
        .await
}


pub async fn select_semillas_recientes(pool: &PgPool,
                                       nit: &str,
                                       limite: i64
) -> Result<Vec<Semilla>, sqlx::Error> {
    sqlx::query_as::<_, Semilla>(&format!(
        "{COLUMNS} WHERE proveedor_nit = $1
         ORDER BY fecha_ingreso DESC, codigo
         LIMIT $2"
    ))
        .bind(nit)
        .bind(limite)
        .fetch_all(pool)
        .await
}
