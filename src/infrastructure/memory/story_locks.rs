//! In-Memory Story Lock Registry
//!
//! 每个故事一把异步互斥锁，按需创建

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{StoryLockGuard, StoryLockPort};
use crate::domain::story::StoryId;

/// 登记数量超过该值时，在获取锁前清理空闲条目
const PRUNE_THRESHOLD: usize = 1024;

/// 内存故事写锁表
pub struct InMemoryStoryLocks {
    locks: DashMap<StoryId, Arc<Mutex<()>>>,
}

impl InMemoryStoryLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 移除当前无人持有也无人等待的锁
    pub fn prune_idle(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let removed = before.saturating_sub(self.locks.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.locks.len(), "Idle story locks pruned");
        }
        removed
    }
}

impl Default for InMemoryStoryLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryLockPort for InMemoryStoryLocks {
    async fn acquire(&self, story_id: StoryId) -> StoryLockGuard {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.prune_idle();
        }

        // 先克隆出 Arc 再等待，避免持有 DashMap 分片锁跨 await
        let lock = self
            .locks
            .entry(story_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;
        StoryLockGuard::new(guard)
    }
}
