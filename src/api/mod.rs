//! Superficie REST del inventario (`/api/v1`).


use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::context::domain::AppContext;
use crate::database::domain::Store;

mod error;
mod extractors;
mod proveedores;
mod semillas;



/// Cualquier origen (incluido `file://`), métodos del CRUD y cualquier cabecera.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}


pub fn router<S: Store>(app_context: AppContext<S>) -> Router {
    Router::new()
        .merge(proveedores::router::<S>())
        .merge(semillas::router::<S>())
        .with_state(app_context)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}


/// Levanta el servidor HTTP y espera hasta recibir Ctrl-C o SIGTERM.
pub async fn serve<S: Store>(app_context: AppContext<S>) -> std::io::Result<()> {
    let address = app_context.system.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Info: servidor HTTP escuchando en {address}");

    axum::serve(listener, router(app_context))
        .with_graceful_shutdown(shutdown_signal())
        .await
}


async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Error: no se pudo escuchar Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Error: no se pudo escuchar SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Info: apagando servidor HTTP");
}
