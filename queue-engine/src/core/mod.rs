//! Core: configuration, engine wiring, background tasks

pub mod config;
pub mod engine;
pub mod tasks;

pub use config::Config;
pub use engine::{EngineContext, QueueEngine, WriteTx};
pub use tasks::{BackgroundTasks, TaskKind};
