//! Story Context - 故事限界上下文
//!
//! 职责:
//! - 故事聚合管理
//! - 发布状态机（自动草稿 / 发布提示）

mod aggregate;
mod errors;
mod publication;
mod value_objects;

pub use aggregate::Story;
pub use errors::StoryError;
pub use publication::{transition, ChapterEvent, ChapterEventKind, PublicationOutcome};
pub use value_objects::{StoryId, StoryStatus, StoryTitle};
