//! Story Queries

use uuid::Uuid;

/// 获取故事详情
#[derive(Debug, Clone)]
pub struct GetStory {
    pub story_id: Uuid,
}

/// 列出所有故事
#[derive(Debug, Clone)]
pub struct ListStories;
