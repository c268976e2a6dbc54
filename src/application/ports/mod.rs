//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod repositories;
mod story_lock;

pub use repositories::{ChapterChange, RepositoryError, StoryRepositoryPort};
pub use story_lock::{StoryLockGuard, StoryLockPort};
