//! In-Memory Story Repository Implementation
//!
//! 用于测试和无需持久化的临时运行。写操作的串行化由故事写锁保证。

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{ChapterChange, RepositoryError, StoryRepositoryPort};
use crate::domain::chapter::{Chapter, ChapterId};
use crate::domain::story::{Story, StoryId};

/// 内存故事仓储
pub struct InMemoryStoryRepository {
    stories: DashMap<StoryId, Story>,
    chapters: DashMap<ChapterId, Chapter>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self {
            stories: DashMap::new(),
            chapters: DashMap::new(),
        }
    }
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryRepositoryPort for InMemoryStoryRepository {
    async fn save_story(&self, story: &Story) -> Result<(), RepositoryError> {
        self.stories.insert(*story.id(), story.clone());
        Ok(())
    }

    async fn find_story(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        Ok(self.stories.get(&id).map(|s| s.clone()))
    }

    async fn find_all_stories(&self) -> Result<Vec<Story>, RepositoryError> {
        let mut stories: Vec<Story> = self.stories.iter().map(|e| e.value().clone()).collect();
        stories.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(stories)
    }

    async fn delete_story(&self, id: StoryId) -> Result<(), RepositoryError> {
        if self.stories.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("story {}", id)));
        }
        self.chapters.retain(|_, chapter| chapter.story_id() != &id);
        Ok(())
    }

    async fn find_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, RepositoryError> {
        Ok(self.chapters.get(&id).map(|c| c.clone()))
    }

    async fn find_chapters_by_story(
        &self,
        story_id: StoryId,
    ) -> Result<Vec<Chapter>, RepositoryError> {
        Ok(self
            .chapters
            .iter()
            .filter(|e| e.value().story_id() == &story_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn commit_chapter_change(
        &self,
        change: &ChapterChange,
        story: Option<&Story>,
    ) -> Result<(), RepositoryError> {
        // 先完成全部检查，再写入，避免只写一半
        if let ChapterChange::Delete(id) = change {
            if !self.chapters.contains_key(id) {
                return Err(RepositoryError::NotFound(format!("chapter {}", id)));
            }
        }
        if let Some(story) = story {
            if !self.stories.contains_key(story.id()) {
                return Err(RepositoryError::NotFound(format!("story {}", story.id())));
            }
        }

        match change {
            ChapterChange::Upsert(chapter) => {
                self.chapters.insert(*chapter.id(), chapter.clone());
            }
            ChapterChange::Delete(id) => {
                self.chapters.remove(id);
            }
        }
        if let Some(story) = story {
            self.stories.insert(*story.id(), story.clone());
        }

        tracing::debug!(
            change = change.as_str(),
            story_written = story.is_some(),
            "Chapter change committed (memory)"
        );
        Ok(())
    }
}
