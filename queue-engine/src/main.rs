use std::time::Duration;

use anyhow::Context;
use queue_engine::audit::AuditIntegrityScheduler;
use queue_engine::utils::logger::init_logger_with_file;
use queue_engine::{BackgroundTasks, Config, DbService, QueueEngine, StaleEntrySweeper, TaskKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment, config, logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    let log_dir = config.log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create log directory {}: {}", log_dir.display(), e);
    }
    init_logger_with_file(Some(&config.log_level), Some(&log_dir));
    config.validate()?;

    tracing::info!("Queue engine starting...");

    // 2. Store
    let db = DbService::new(&config.database_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    let engine = QueueEngine::new(db, config);

    // 3. Background tasks
    let mut tasks = BackgroundTasks::new();

    let audit = engine.audit();
    tasks.spawn("audit_chain_warmup", TaskKind::Warmup, async move {
        for result in [audit.verify_queue_chain().await, audit.verify_assignment_chain().await] {
            match result {
                Ok(v) if v.chain_intact => {
                    tracing::info!(log = v.log.table(), entries = v.total_entries, "Audit chain intact");
                }
                Ok(v) => {
                    tracing::warn!(log = v.log.table(), breaks = v.breaks.len(), "Audit chain broken");
                }
                Err(e) => tracing::error!("Audit chain verification failed: {}", e),
            }
        }
    });

    let integrity = AuditIntegrityScheduler::new(
        engine.audit(),
        tasks.shutdown_token(),
        Duration::from_secs(engine.config().integrity_check_interval_secs),
        engine.config().timezone,
    );
    tasks.spawn("audit_integrity_check", TaskKind::Periodic, integrity.run());

    let sweeper = StaleEntrySweeper::new(engine.clone(), tasks.shutdown_token());
    tasks.spawn("stale_entry_sweeper", TaskKind::Periodic, sweeper.run());

    tasks.log_summary();

    // 4. Run until Ctrl-C
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    engine.pool().close().await;

    tracing::info!("Queue engine stopped");
    Ok(())
}
