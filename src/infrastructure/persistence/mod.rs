//! Persistence Layer - 数据持久化
//!
//! SQLite 存储实现（内存实现见 `infrastructure::memory`）

pub mod sqlite;

pub use self::sqlite::{create_pool, run_migrations, DatabaseConfig, DbPool, SqliteStoryRepository};
