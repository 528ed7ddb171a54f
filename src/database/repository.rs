use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tokio::time::sleep;
use crate::config::postgres::{MAX_CONNECTIONS, WAIT_FOR};
use crate::database::domain::Store;
use crate::database::tables::proveedores::{create_table_proveedores, delete_proveedor, insert_proveedor,
                                           lock_proveedor_for_share, lock_proveedor_for_update,
                                           select_proveedor, select_proveedores, update_proveedor};
use crate::database::tables::semillas::{count_semillas_de_proveedor, create_table_semillas, delete_semilla,
                                        exists_semilla, insert_semilla, lock_semilla_for_update,
                                        select_semilla, select_semillas, select_semillas_recientes,
                                        update_semilla};
use crate::error::domain::InventoryError;
use crate::proveedor::domain::{Proveedor, ProveedorFiltro};
use crate::semilla::domain::{Semilla, SemillaConsulta};


/// Implementación de `Store` sobre PostgreSQL.
#[derive(Clone, Debug)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = create_pool(database_url, pool_size).await?;
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Reintenta la conexión y la creación del esquema hasta que ambas funcionen.
    pub async fn create_repository(database_url: &str, pool_size: u32) -> Self {
        loop {
            match Self::new(database_url, pool_size).await {
                Ok(repo) => {
                    info!("Info: repositorio postgres listo");
                    return repo
                },
                Err(e) => {
                    error!("Error inicializando repo: {:?}", e);
                    sleep(WAIT_FOR).await;
                }
            }
        }
    }
}


impl Store for Repository {

    async fn crear_proveedor(&self, proveedor: Proveedor) -> Result<Proveedor, InventoryError> {
        insert_proveedor(&self.pool, &proveedor)
            .await?
            .ok_or(InventoryError::ProveedorAlreadyExists(proveedor.nit))
    }

    async fn obtener_proveedor(&self, nit: &str) -> Result<Option<Proveedor>, InventoryError> {
        Ok(select_proveedor(&self.pool, nit).await?)
    }

    async fn actualizar_proveedor(&self, proveedor: Proveedor) -> Result<Proveedor, InventoryError> {
        update_proveedor(&self.pool, &proveedor)
            .await?
            .ok_or(InventoryError::ProveedorNotFound(proveedor.nit))
    }

    async fn eliminar_proveedor(&self, nit: &str) -> Result<(), InventoryError> {
        let mut tx = self.pool.begin().await?;

        if !lock_proveedor_for_update(&mut *tx, nit).await? {
            return Err(InventoryError::ProveedorNotFound(nit.to_string()));
        }

        let asociadas = count_semillas_de_proveedor(&mut *tx, nit).await?;
        if asociadas > 0 {
            return Err(InventoryError::ConflictStorage(format!(
                "el proveedor '{nit}' tiene {asociadas} semilla(s) asociada(s)"
            )));
        }

        delete_proveedor(&mut *tx, nit).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn listar_proveedores(&self, filtro: &ProveedorFiltro) -> Result<Vec<Proveedor>, InventoryError> {
        Ok(select_proveedores(&self.pool, filtro).await?)
    }

    async fn crear_semilla(&self, semilla: Semilla) -> Result<Semilla, InventoryError> {
        let mut tx = self.pool.begin().await?;

        if exists_semilla(&mut *tx, &semilla.codigo).await? {
            return Err(InventoryError::SemillaAlreadyExists(semilla.codigo));
        }
        if !lock_proveedor_for_share(&mut *tx, &semilla.proveedor_nit).await? {
            return Err(InventoryError::ProveedorNotFound(semilla.proveedor_nit));
        }

        let creada = insert_semilla(&mut *tx, &semilla)
            .await?
            .ok_or_else(|| InventoryError::SemillaAlreadyExists(semilla.codigo.clone()))?;

        tx.commit().await?;
        Ok(creada)
    }

    async fn obtener_semilla(&self, codigo: &str) -> Result<Option<Semilla>, InventoryError> {
        Ok(select_semilla(&self.pool, codigo).await?)
    }

    async fn actualizar_semilla(&self, semilla: Semilla) -> Result<Semilla, InventoryError> {
        let mut tx = self.pool.begin().await?;

        if !lock_semilla_for_update(&mut *tx, &semilla.codigo).await? {
            return Err(InventoryError::SemillaNotFound(semilla.codigo));
        }
        if !lock_proveedor_for_share(&mut *tx, &semilla.proveedor_nit).await? {
            return Err(InventoryError::ProveedorNotFound(semilla.proveedor_nit));
        }

        let actualizada = update_semilla(&mut *tx, &semilla)
            .await?
            .ok_or_else(|| InventoryError::SemillaNotFound(semilla.codigo.clone()))?;

        tx.commit().await?;
        Ok(actualizada)
    }

    async fn eliminar_semilla(&self, codigo: &str) -> Result<(), InventoryError> {
        match delete_semilla(&self.pool, codigo).await? {
            0 => Err(InventoryError::SemillaNotFound(codigo.to_string())),
            _ => Ok(()),
        }
    }

    async fn listar_semillas(&self, consulta: &SemillaConsulta) -> Result<Vec<Semilla>, InventoryError> {
        Ok(select_semillas(&self.pool, consulta).await?)
    }

    async fn semillas_recientes_de_proveedor(&self, nit: &str, limite: i64) -> Result<Vec<Semilla>, InventoryError> {
        Ok(select_semillas_recientes(&self.pool, nit, limite).await?)
    }
}


async fn create_pool(database_url: &str, pool_size: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(pool_size.min(MAX_CONNECTIONS))
        .connect(database_url)
        .await?;

    Ok(pool)
}


async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    create_table_proveedores(pool).await?;
    create_table_semillas(pool).await?;
    Ok(())
}
