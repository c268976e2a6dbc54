//! Story Commands

use uuid::Uuid;

/// 创建故事命令（初始为草稿）
#[derive(Debug, Clone)]
pub struct CreateStory {
    pub title: String,
}

/// 显式发布故事命令（幂等）
#[derive(Debug, Clone)]
pub struct PublishStory {
    pub story_id: Uuid,
}

/// 删除故事命令（级联删除章节）
#[derive(Debug, Clone)]
pub struct DeleteStory {
    pub story_id: Uuid,
}
