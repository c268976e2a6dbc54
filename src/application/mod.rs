//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（StoryRepository、StoryLock）
//! - commands: CQRS 命令及处理器（章节增删改在故事写锁内完成）
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

mod support;

// Re-exports
pub use commands::{
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    UpdateChapter,
    // Story commands
    CreateStory,
    DeleteStory,
    PublishStory,
    // Handlers
    handlers::{
        CreateChapterHandler, CreateChapterResponse, CreateStoryHandler, CreateStoryResponse,
        DeleteChapterHandler, DeleteChapterResponse, DeleteStoryHandler, PublishStoryHandler,
        PublishStoryResponse, UpdateChapterHandler, UpdateChapterResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{ChapterChange, RepositoryError, StoryLockGuard, StoryLockPort, StoryRepositoryPort};

pub use queries::{
    // Chapter queries
    CheckLastQualifying,
    FetchSlotState,
    GetChapter,
    ListChapters,
    // Story queries
    GetStory,
    ListStories,
    // Handlers
    handlers::{
        ChapterResponse, CheckLastQualifyingHandler, FetchSlotStateHandler, GetChapterHandler,
        GetStoryHandler, LastQualifyingResponse, ListChaptersHandler, ListStoriesHandler,
        SlotStateResponse, StoryResponse,
    },
};
