//! Story Context - 发布状态机
//!
//! 章节变更后根据「合格可见章节数」的前后变化决定故事状态：
//! - 合格数降为 0 且故事已发布 → 自动转为草稿
//! - 合格数从 0 升至 ≥1 且故事为草稿 → 仅提示发布，不改变状态
//!
//! 故事永远不会被自动发布，升级到 Published 只能通过显式的发布操作。

use serde::{Deserialize, Serialize};

use super::{StoryId, StoryStatus};

/// 触发状态机重算的章节事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChapterEventKind {
    ChapterCreated,
    /// 章节更新（类型变化同样可能改变其是否计入合格数）
    ChapterVisibilityChanged,
    ChapterDeleted,
}

impl ChapterEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterEventKind::ChapterCreated => "chapter_created",
            ChapterEventKind::ChapterVisibilityChanged => "chapter_visibility_changed",
            ChapterEventKind::ChapterDeleted => "chapter_deleted",
        }
    }
}

/// 章节变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterEvent {
    pub story_id: StoryId,
    pub kind: ChapterEventKind,
}

impl ChapterEvent {
    pub fn created(story_id: StoryId) -> Self {
        Self {
            story_id,
            kind: ChapterEventKind::ChapterCreated,
        }
    }

    pub fn visibility_changed(story_id: StoryId) -> Self {
        Self {
            story_id,
            kind: ChapterEventKind::ChapterVisibilityChanged,
        }
    }

    pub fn deleted(story_id: StoryId) -> Self {
        Self {
            story_id,
            kind: ChapterEventKind::ChapterDeleted,
        }
    }
}

/// 状态机一次转移的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationOutcome {
    pub status_after: StoryStatus,
    pub auto_drafted: bool,
    pub publish_prompt: bool,
}

impl PublicationOutcome {
    fn unchanged(status: StoryStatus) -> Self {
        Self {
            status_after: status,
            auto_drafted: false,
            publish_prompt: false,
        }
    }

    /// 是否需要写回故事状态
    pub fn status_changed(&self) -> bool {
        self.auto_drafted
    }
}

/// 纯转移函数
///
/// `before` / `after` 为变更前后在同一快照上计算的合格可见章节数
pub fn transition(status: StoryStatus, before: usize, after: usize) -> PublicationOutcome {
    match status {
        StoryStatus::Published if after == 0 => PublicationOutcome {
            status_after: StoryStatus::Draft,
            auto_drafted: true,
            publish_prompt: false,
        },
        StoryStatus::Draft if before == 0 && after >= 1 => PublicationOutcome {
            status_after: StoryStatus::Draft,
            auto_drafted: false,
            publish_prompt: true,
        },
        _ => PublicationOutcome::unchanged(status),
    }
}
