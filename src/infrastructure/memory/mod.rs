//! Memory Layer - In-Memory State Management
//!
//! 故事写锁表与内存故事仓储

mod story_locks;
mod story_repo;

pub use story_locks::InMemoryStoryLocks;
pub use story_repo::InMemoryStoryRepository;
