use anyhow::Context;

use bookrack_app::modules;
use bookrack_kernel::settings::Settings;
use bookrack_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookrack settings")?;

    bookrack_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint,
        "bookrack bootstrap starting"
    );

    // A failed connection is logged inside `connect`; the server still
    // starts and store operations fail until the store is reachable.
    let db = bookrack_db::connect(&settings.database).await;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    if let Err(err) = bookrack_db::apply_migrations(&db, registry.collect_migrations()).await {
        tracing::error!(error = %err, "failed to apply store migrations; continuing");
    }

    registry.start_all(&ctx).await?;

    tracing::info!("bookrack bootstrap complete");

    bookrack_http::start_server(&registry, &settings).await
}
