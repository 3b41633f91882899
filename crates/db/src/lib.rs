//! SurrealDB client factory and migration runner for bookrack.

use anyhow::Context;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;

use bookrack_kernel::settings::DatabaseSettings;
use bookrack_kernel::Migration;

/// Open the shared document store handle.
///
/// Connection failure is logged rather than returned: the process keeps
/// serving and every store operation fails until the store is reachable.
pub async fn connect(settings: &DatabaseSettings) -> Surreal<Any> {
    let db: Surreal<Any> = Surreal::init();

    if let Err(err) = db.connect(settings.endpoint.as_str()).await {
        tracing::error!(
            error = %err,
            endpoint = %settings.endpoint,
            "document store connection failed; queries will fail until it is reachable"
        );
        return db;
    }

    tracing::info!(endpoint = %settings.endpoint, "connected to document store");

    if let Err(err) = db
        .use_ns(settings.namespace.clone())
        .use_db(settings.database.clone())
        .await
    {
        tracing::error!(
            error = %err,
            namespace = %settings.namespace,
            database = %settings.database,
            "failed to select store namespace/database"
        );
    }

    db
}

/// Apply module-contributed migrations in registration order.
pub async fn apply_migrations(
    db: &Surreal<Any>,
    migrations: Vec<(String, Migration)>,
) -> anyhow::Result<()> {
    for (module, migration) in migrations {
        tracing::info!(module = %module, id = migration.id, "applying store migration");

        db.query(migration.up)
            .await
            .and_then(|response| response.check())
            .with_context(|| {
                format!(
                    "migration '{}' for module '{}' failed",
                    migration.id, module
                )
            })?;
    }

    Ok(())
}
