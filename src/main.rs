use std::process::ExitCode;
use tracing::{error, info};
use crate::context::domain::AppContext;
use crate::database::domain::Store;
use crate::database::memory::MemoryStore;
use crate::database::repository::Repository;
use crate::system::domain::{init_tracing, ConfigError, StorageBackend, System};

mod api;
mod config;
mod context;
mod database;
mod error;
mod mapper;
mod proveedor;
mod semilla;
mod system;


#[tokio::main]
async fn main() -> ExitCode {

    let system = match System::new() {
        Ok(system) => system,
        Err(e) => {
            eprintln!("Error: configuración inválida: {e}");
            return ExitCode::FAILURE
        }
    };

    init_tracing(&system);
    info!("Info: iniciando inventario ({}, backend {:?})", system.environment, system.storage);

    let result = match system.storage {
        StorageBackend::Postgres => {
            let Some(url) = system.database_url.clone() else {
                error!("Error: {}", ConfigError::Missing("DATABASE_URL"));
                return ExitCode::FAILURE
            };
            let repo = Repository::create_repository(&url, system.db_pool_size).await;
            run(repo, system).await
        },
        StorageBackend::Memory => run(MemoryStore::new(), system).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: servidor HTTP terminó con fallo: {e}");
            ExitCode::FAILURE
        }
    }
}


async fn run<S: Store>(store: S, system: System) -> std::io::Result<()> {
    api::serve(AppContext::new(store, system)).await
}
