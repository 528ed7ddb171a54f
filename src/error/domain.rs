//! Taxonomía de errores del inventario.
//!
//! Todos los casos de uso devuelven `InventoryError`; la traducción a HTTP se hace
//! una sola vez en `api::error`.


use serde::Serialize;
use thiserror::Error;


/// Error de validación asociado a un campo del cuerpo o de la consulta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}


impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}


#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Cuerpo JSON inválido: {0}")]
    MalformedBody(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("El proveedor con NIT '{0}' no existe")]
    ProveedorNotFound(String),

    #[error("La semilla con código '{0}' no existe")]
    SemillaNotFound(String),

    #[error("Ya existe un proveedor con NIT '{0}'")]
    ProveedorAlreadyExists(String),

    #[error("Ya existe una semilla con código '{0}'")]
    SemillaAlreadyExists(String),

    #[error("Conflicto de datos (clave duplicada o restricción): {0}")]
    ConflictStorage(String),

    #[error("{0}")]
    Internal(String),
}


impl InventoryError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        InventoryError::Validation(vec![FieldError::new(field, message)])
    }
}


impl From<sqlx::Error> for InventoryError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db) = &e {
            if matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) {
                return InventoryError::ConflictStorage(db.message().to_string());
            }
        }

        tracing::error!("Error: operación de almacenamiento fallida: {e:?}");
        InventoryError::Internal(e.to_string())
    }
}


fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_every_field() {
        let err = InventoryError::Validation(vec![
            FieldError::new("precio", "debe ser mayor o igual a 0"),
            FieldError::new("stock", "debe ser mayor o igual a 0"),
        ]);

        assert_eq!(
            err.to_string(),
            "precio: debe ser mayor o igual a 0; stock: debe ser mayor o igual a 0"
        );
    }

    #[test]
    fn non_database_sqlx_errors_are_internal() {
        let err: InventoryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, InventoryError::Internal(_)));
    }

    mod driver {
        use std::error::Error as StdError;
        use sqlx::error::{DatabaseError, ErrorKind};

        /// Error del driver con un `ErrorKind` fijo.
        #[derive(Debug, thiserror::Error)]
        #[error("{message}")]
        pub struct FakeDbError {
            pub message: String,
            pub kind: fn() -> ErrorKind,
        }

        impl DatabaseError for FakeDbError {
            fn message(&self) -> &str {
                &self.message
            }

            fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
                self
            }

            fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
                self
            }

            fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
                self
            }

            fn kind(&self) -> ErrorKind {
                (self.kind)()
            }
        }

        pub fn sqlx_error(message: &str, kind: fn() -> ErrorKind) -> sqlx::Error {
            sqlx::Error::Database(Box::new(FakeDbError {
                message: message.to_string(),
                kind,
            }))
        }
    }

    #[test]
    fn constraint_violations_are_storage_conflicts() {
        use sqlx::error::ErrorKind;

        let casos: [(&str, fn() -> ErrorKind); 4] = [
            ("duplicate key value violates unique constraint \"proveedores_pkey\"", || ErrorKind::UniqueViolation),
            ("insert or update on table \"semillas\" violates foreign key constraint", || ErrorKind::ForeignKeyViolation),
            ("new row for relation \"semillas\" violates check constraint", || ErrorKind::CheckViolation),
            ("null value in column \"nombre\" violates not-null constraint", || ErrorKind::NotNullViolation),
        ];

        for (mensaje, kind) in casos {
            let err: InventoryError = driver::sqlx_error(mensaje, kind).into();
            match err {
                InventoryError::ConflictStorage(detail) => assert_eq!(detail, mensaje),
                other => panic!("se esperaba ConflictStorage para '{mensaje}', llegó {other:?}"),
            }
        }
    }

    #[test]
    fn other_database_errors_are_internal() {
        use sqlx::error::ErrorKind;

        let err: InventoryError = driver::sqlx_error("deadlock detected", || ErrorKind::Other).into();
        match err {
            InventoryError::Internal(texto) => assert!(texto.contains("deadlock detected")),
            other => panic!("se esperaba Internal, llegó {other:?}"),
        }
    }
}
