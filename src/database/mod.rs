pub mod domain;
pub mod memory;
pub mod repository;
pub mod tables;
