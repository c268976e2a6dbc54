//! Story Lock Port - 按故事串行化写操作
//!
//! 同一故事的「章节写入 + 状态机重算」必须一次只有一个写者，
//! 否则两个并发删除可能都基于过期的合格数做出判断。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::story::StoryId;

/// 故事写锁守卫，离开作用域即释放
#[derive(Debug)]
pub struct StoryLockGuard {
    _guard: OwnedMutexGuard<()>,
}

impl StoryLockGuard {
    pub fn new(guard: OwnedMutexGuard<()>) -> Self {
        Self { _guard: guard }
    }
}

/// Story Lock Port
#[async_trait]
pub trait StoryLockPort: Send + Sync {
    /// 获取故事写锁，等待直到前一个写者完成
    async fn acquire(&self, story_id: StoryId) -> StoryLockGuard;
}
