//! Story Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::publication::{transition, ChapterEvent, PublicationOutcome};
use super::{StoryId, StoryStatus, StoryTitle};

/// Story 聚合根
///
/// 不变量:
/// - 状态只会经由发布状态机（自动转草稿）或显式发布操作改变
/// - 新建故事一律为草稿
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    title: StoryTitle,
    status: StoryStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Story {
    /// 创建新故事（草稿）
    pub fn new(title: StoryTitle) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::new(),
            title,
            status: StoryStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// 从持久化数据重建
    pub fn restore(
        id: StoryId,
        title: StoryTitle,
        status: StoryStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            status,
            created_at,
            updated_at,
        }
    }

    /// 显式发布（幂等，不检查合格章节数）
    ///
    /// 返回状态是否发生变化
    pub fn publish(&mut self) -> bool {
        if self.status.is_published() {
            return false;
        }
        self.status = StoryStatus::Published;
        self.updated_at = Utc::now();
        true
    }

    /// 对章节事件执行状态机转移，并把结果应用到自身
    pub fn apply_chapter_event(
        &mut self,
        event: &ChapterEvent,
        before: usize,
        after: usize,
    ) -> PublicationOutcome {
        debug_assert_eq!(event.story_id, self.id);

        let outcome = transition(self.status, before, after);
        if outcome.status_changed() {
            self.status = outcome.status_after;
            self.updated_at = Utc::now();
        }

        tracing::debug!(
            story_id = %self.id,
            event = event.kind.as_str(),
            before,
            after,
            status_after = %outcome.status_after,
            auto_drafted = outcome.auto_drafted,
            publish_prompt = outcome.publish_prompt,
            "Publication transition evaluated"
        );

        outcome
    }

    // Getters
    pub fn id(&self) -> &StoryId {
        &self.id
    }

    pub fn title(&self) -> &StoryTitle {
        &self.title
    }

    pub fn status(&self) -> StoryStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
