//! Storyline - 故事章节槽位与发布状态服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 故事聚合与发布状态机
//! - Chapter Context: 章节槽位分配、排序键、可见性统计、最后合格章节检查
//!
//! 应用层 (application/):
//! - Ports: 端口定义（StoryRepository, StoryLock）
//! - Commands: CQRS 命令处理器（按故事串行化）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 故事写锁表、内存仓储
//! - Persistence: SQLite 存储
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
