//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / 内存）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chapter::{Chapter, ChapterId};
use crate::domain::story::{Story, StoryId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 单次章节写入
#[derive(Debug, Clone)]
pub enum ChapterChange {
    /// 新建或整体覆盖
    Upsert(Chapter),
    /// 删除，目标不存在时返回 `RepositoryError::NotFound`
    Delete(ChapterId),
}

impl ChapterChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterChange::Upsert(_) => "upsert",
            ChapterChange::Delete(_) => "delete",
        }
    }
}

/// Story Repository Port
///
/// 故事与其章节同属一个聚合边界，由同一个仓储负责
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    /// 保存故事（新建或覆盖）
    async fn save_story(&self, story: &Story) -> Result<(), RepositoryError>;

    /// 根据 ID 查找故事
    async fn find_story(&self, id: StoryId) -> Result<Option<Story>, RepositoryError>;

    /// 获取所有故事（按创建时间倒序）
    async fn find_all_stories(&self) -> Result<Vec<Story>, RepositoryError>;

    /// 删除故事及其全部章节
    async fn delete_story(&self, id: StoryId) -> Result<(), RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError>;

    /// 获取故事的全部章节（顺序不保证）
    async fn find_chapters_by_story(
        &self,
        story_id: StoryId,
    ) -> Result<Vec<Chapter>, RepositoryError>;

    /// 原子地写入章节变更以及（可选的）故事状态变更
    ///
    /// 两者必须同时成功或同时失败
    async fn commit_chapter_change(
        &self,
        change: &ChapterChange,
        story: Option<&Story>,
    ) -> Result<(), RepositoryError>;
}
