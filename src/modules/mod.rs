pub mod books;

use std::sync::Arc;

use surrealdb::engine::any::Any;
use surrealdb::Surreal;

use bookrack_kernel::ModuleRegistry;

/// Register all application modules with the registry, wiring each one to
/// the shared store handle.
pub fn register_all(registry: &mut ModuleRegistry, db: &Surreal<Any>) {
    let store: books::store::SharedStore =
        Arc::new(books::store::SurrealBookStore::new(db.clone()));
    registry.register(books::create_module(store));
}
