pub mod proveedores;
pub mod semillas;
