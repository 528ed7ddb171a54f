pub mod postgres {
    use tokio::time::{Duration};

    pub const WAIT_FOR: Duration = Duration::from_secs(5);
    pub const MAX_CONNECTIONS: u32 = 20;
}

pub mod http {
    pub const BASE_PATH: &str = "/api/v1";
    pub const PROVEEDORES: &str = "/proveedores";
    pub const SEMILLAS: &str = "/semillas";
}

pub mod inventario {
    /// Patrón de fecha aceptado y emitido en la API (sin zona horaria).
    pub const FORMATO_FECHA: &str = "%Y-%m-%dT%H:%M:%S";
    pub const FORMATO_FECHA_LEGIBLE: &str = "yyyy-MM-dd'T'HH:mm:ss";
    pub const MAX_LONGITUD_CLAVE: usize = 20;
    pub const TOP_SEMILLAS: i64 = 2;
}
