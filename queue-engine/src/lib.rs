//! Station Assignment & Queue Orchestration Engine
//!
//! Assigns staff to service stations over date ranges, issues day- and
//! slot-scoped queue codes under a capacity limit, and drives queue entries
//! through their lifecycle with a hash-chained audit trail.
//!
//! # Module layout
//!
//! ```text
//! queue-engine/src/
//! ├── core/          # config, engine wiring, background tasks
//! ├── db/            # SQLite pool + repositories
//! ├── stations/      # station registry
//! ├── assignments/   # employee ↔ station scheduling
//! ├── queue/         # queue codes + entry state machine
//! ├── routing/       # default station, station queue, stats
//! ├── audit/         # hash-chained logs, integrity check
//! ├── sweeper.rs     # stale entry sweep
//! └── utils/         # logging, business time zone
//! ```

pub mod assignments;
pub mod audit;
pub mod core;
pub mod db;
pub mod error;
pub mod queue;
pub mod routing;
pub mod stations;
pub mod sweeper;
pub mod utils;

pub use core::{BackgroundTasks, Config, QueueEngine, TaskKind};
pub use db::DbService;
pub use error::{EngineError, EngineResult};
pub use sweeper::StaleEntrySweeper;

// Re-export the caller-facing error shape
pub use shared::error::{AppError, AppResult, ErrorCode};
