//! Estado compartido por los handlers HTTP: el almacén y la configuración.


use std::sync::Arc;
use crate::database::domain::Store;
use crate::system::domain::System;


#[derive(Clone, Debug)]
pub struct AppContext<S: Store> {
    pub repo: S,
    pub system: Arc<System>,
}


impl<S: Store> AppContext<S> {
    pub fn new(repo: S, system: System) -> Self {
        Self { repo, system: Arc::new(system) }
    }
}
