//! Story Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::StoryRepositoryPort;
use crate::application::queries::{GetStory, ListStories};
use crate::application::support::require_story;
use crate::domain::chapter::{qualifying_visible_count, Chapter};
use crate::domain::story::{Story, StoryId, StoryStatus};

// ============================================================================
// Response DTOs
// ============================================================================

/// 故事详情响应
#[derive(Debug, Clone)]
pub struct StoryResponse {
    pub id: Uuid,
    pub title: String,
    pub status: StoryStatus,
    pub chapter_count: usize,
    /// 已发布的编号章节数
    pub qualifying_visible_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl StoryResponse {
    fn build(story: &Story, chapters: &[Chapter]) -> Self {
        Self {
            id: *story.id().as_uuid(),
            title: story.title().to_string(),
            status: story.status(),
            chapter_count: chapters.len(),
            qualifying_visible_count: qualifying_visible_count(chapters),
            created_at: story.created_at().to_rfc3339(),
            updated_at: story.updated_at().to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetStory Handler
pub struct GetStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl GetStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: GetStory) -> Result<StoryResponse, ApplicationError> {
        let story_id = StoryId::from_uuid(query.story_id);
        let story = require_story(self.story_repo.as_ref(), story_id).await?;
        let chapters = self.story_repo.find_chapters_by_story(story_id).await?;

        Ok(StoryResponse::build(&story, &chapters))
    }
}

/// ListStories Handler
pub struct ListStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    /// 按创建时间倒序
    pub async fn handle(&self, _query: ListStories) -> Result<Vec<StoryResponse>, ApplicationError> {
        let stories = self.story_repo.find_all_stories().await?;

        let mut responses = Vec::with_capacity(stories.len());
        for story in &stories {
            let chapters = self.story_repo.find_chapters_by_story(*story.id()).await?;
            responses.push(StoryResponse::build(story, &chapters));
        }

        Ok(responses)
    }
}
