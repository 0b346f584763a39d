//! Engine wiring
//!
//! [`QueueEngine`] owns the pool, the configuration and the write lock, and
//! hands out the component services. All components share one
//! [`EngineContext`]; none of them keeps ambient global state.

use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::config::Config;
use crate::assignments::AssignmentScheduler;
use crate::audit::AuditService;
use crate::db::DbService;
use crate::error::EngineResult;
use crate::queue::QueueService;
use crate::routing::RoutingResolver;
use crate::stations::StationRegistry;

/// State shared by every component
#[derive(Clone)]
pub struct EngineContext {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// Serializes every mutating transaction in this process
    write_lock: Arc<Mutex<()>>,
}

impl EngineContext {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Take the write lock, then open a transaction
    ///
    /// Validation reads and writes of one operation all go through the
    /// returned [`WriteTx`]; dropping it without `commit` rolls back.
    pub async fn begin_write(&self) -> EngineResult<WriteTx> {
        let guard = self.write_lock.clone().lock_owned().await;
        let tx = self.pool.begin().await?;
        Ok(WriteTx { tx, _guard: guard })
    }

    /// Plain connection for read-only operations
    pub async fn read(&self) -> EngineResult<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }
}

/// Transaction held under the engine's write lock
pub struct WriteTx {
    // Declared first: the transaction is released before the lock
    tx: Transaction<'static, Sqlite>,
    _guard: OwnedMutexGuard<()>,
}

impl WriteTx {
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> EngineResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Station Assignment & Queue Orchestration Engine
#[derive(Clone)]
pub struct QueueEngine {
    ctx: EngineContext,
}

impl QueueEngine {
    pub fn new(db: DbService, config: Config) -> Self {
        Self {
            ctx: EngineContext::new(db.pool, config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.ctx.pool
    }

    pub fn stations(&self) -> StationRegistry {
        StationRegistry::new(self.ctx.clone())
    }

    pub fn assignments(&self) -> AssignmentScheduler {
        AssignmentScheduler::new(self.ctx.clone())
    }

    pub fn queue(&self) -> QueueService {
        QueueService::new(self.ctx.clone())
    }

    pub fn routing(&self) -> RoutingResolver {
        RoutingResolver::new(self.ctx.clone())
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.ctx.clone())
    }
}
