//! Story Command Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateStory, DeleteStory, PublishStory};
use crate::application::error::ApplicationError;
use crate::application::ports::{StoryLockPort, StoryRepositoryPort};
use crate::application::support::require_story;
use crate::domain::story::{Story, StoryId, StoryStatus, StoryTitle};

// ============================================================================
// CreateStory
// ============================================================================

/// 创建故事响应
#[derive(Debug, Clone)]
pub struct CreateStoryResponse {
    pub id: Uuid,
    pub title: String,
    pub status: StoryStatus,
}

/// CreateStory Handler
pub struct CreateStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl CreateStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: CreateStory) -> Result<CreateStoryResponse, ApplicationError> {
        let title = StoryTitle::new(command.title)?;
        let story = Story::new(title);

        self.story_repo.save_story(&story).await?;

        tracing::info!(
            story_id = %story.id(),
            title = %story.title(),
            "Story created (draft)"
        );

        Ok(CreateStoryResponse {
            id: *story.id().as_uuid(),
            title: story.title().to_string(),
            status: story.status(),
        })
    }
}

// ============================================================================
// PublishStory
// ============================================================================

/// 发布故事响应
#[derive(Debug, Clone)]
pub struct PublishStoryResponse {
    pub story_id: Uuid,
    pub story_status_after: StoryStatus,
    /// 本次调用是否真正改变了状态
    pub changed: bool,
}

/// PublishStory Handler
///
/// 显式的运营操作：幂等，且不重新检查合格章节数
pub struct PublishStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    story_locks: Arc<dyn StoryLockPort>,
}

impl PublishStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, story_locks: Arc<dyn StoryLockPort>) -> Self {
        Self {
            story_repo,
            story_locks,
        }
    }

    pub async fn handle(&self, command: PublishStory) -> Result<PublishStoryResponse, ApplicationError> {
        let story_id = StoryId::from_uuid(command.story_id);
        let _lock = self.story_locks.acquire(story_id).await;

        let mut story = require_story(self.story_repo.as_ref(), story_id).await?;
        let changed = story.publish();
        if changed {
            self.story_repo.save_story(&story).await?;
            tracing::info!(story_id = %story_id, "Story published");
        } else {
            tracing::debug!(story_id = %story_id, "Story already published");
        }

        Ok(PublishStoryResponse {
            story_id: command.story_id,
            story_status_after: story.status(),
            changed,
        })
    }
}

// ============================================================================
// DeleteStory
// ============================================================================

/// DeleteStory Handler
pub struct DeleteStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    story_locks: Arc<dyn StoryLockPort>,
}

impl DeleteStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, story_locks: Arc<dyn StoryLockPort>) -> Self {
        Self {
            story_repo,
            story_locks,
        }
    }

    pub async fn handle(&self, command: DeleteStory) -> Result<(), ApplicationError> {
        let story_id = StoryId::from_uuid(command.story_id);
        let _lock = self.story_locks.acquire(story_id).await;

        let story = require_story(self.story_repo.as_ref(), story_id).await?;
        self.story_repo.delete_story(story_id).await?;

        tracing::info!(
            story_id = %story_id,
            title = %story.title(),
            "Story deleted"
        );

        Ok(())
    }
}
