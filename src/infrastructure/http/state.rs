//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateChapterHandler, CreateStoryHandler, DeleteChapterHandler, DeleteStoryHandler,
    PublishStoryHandler, UpdateChapterHandler,
    // Query handlers
    CheckLastQualifyingHandler, FetchSlotStateHandler, GetChapterHandler, GetStoryHandler,
    ListChaptersHandler, ListStoriesHandler,
    // Ports
    StoryLockPort, StoryRepositoryPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub story_repo: Arc<dyn StoryRepositoryPort>,
    pub story_locks: Arc<dyn StoryLockPort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub create_story_handler: CreateStoryHandler,
    pub publish_story_handler: PublishStoryHandler,
    pub delete_story_handler: DeleteStoryHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,

    // ========== Query Handlers ==========
    pub get_story_handler: GetStoryHandler,
    pub list_stories_handler: ListStoriesHandler,
    pub fetch_slot_state_handler: FetchSlotStateHandler,
    pub check_last_qualifying_handler: CheckLastQualifyingHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        story_repo: Arc<dyn StoryRepositoryPort>,
        story_locks: Arc<dyn StoryLockPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            // Ports
            story_repo: story_repo.clone(),
            story_locks: story_locks.clone(),
            event_publisher,

            // Command handlers
            create_story_handler: CreateStoryHandler::new(story_repo.clone()),
            publish_story_handler: PublishStoryHandler::new(story_repo.clone(), story_locks.clone()),
            delete_story_handler: DeleteStoryHandler::new(story_repo.clone(), story_locks.clone()),
            create_chapter_handler: CreateChapterHandler::new(
                story_repo.clone(),
                story_locks.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(
                story_repo.clone(),
                story_locks.clone(),
            ),
            delete_chapter_handler: DeleteChapterHandler::new(story_repo.clone(), story_locks),

            // Query handlers
            get_story_handler: GetStoryHandler::new(story_repo.clone()),
            list_stories_handler: ListStoriesHandler::new(story_repo.clone()),
            fetch_slot_state_handler: FetchSlotStateHandler::new(story_repo.clone()),
            check_last_qualifying_handler: CheckLastQualifyingHandler::new(story_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(story_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(story_repo),
        }
    }
}
