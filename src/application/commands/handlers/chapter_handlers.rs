//! Chapter Command Handlers
//!
//! 每个章节写操作都在故事写锁内完成：
//! 读取快照 → 槽位校验 → 状态机重算 → 一次性提交章节与故事状态

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateChapter, DeleteChapter, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterChange, StoryLockPort, StoryRepositoryPort};
use crate::application::support::{
    require_chapter, require_story, settle, take_locked_chapter, warn_if_beyond_convention,
};
use crate::domain::chapter::{Chapter, ChapterId, ChapterKind, SlotState};
use crate::domain::story::{ChapterEvent, StoryId, StoryStatus};

// ============================================================================
// CreateChapter
// ============================================================================

/// 创建章节响应
#[derive(Debug, Clone)]
pub struct CreateChapterResponse {
    pub chapter_id: Uuid,
    pub story_id: Uuid,
    pub kind: ChapterKind,
    pub story_status_after: StoryStatus,
    pub publish_prompt: bool,
    pub auto_drafted: bool,
}

/// CreateChapter Handler
pub struct CreateChapterHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    story_locks: Arc<dyn StoryLockPort>,
}

impl CreateChapterHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, story_locks: Arc<dyn StoryLockPort>) -> Self {
        Self {
            story_repo,
            story_locks,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<CreateChapterResponse, ApplicationError> {
        let story_id = StoryId::from_uuid(command.story_id);
        let _lock = self.story_locks.acquire(story_id).await;

        let mut story = require_story(self.story_repo.as_ref(), story_id).await?;
        let chapters = self.story_repo.find_chapters_by_story(story_id).await?;

        let slots = SlotState::compute(&chapters, None);
        let kind = slots.resolve(command.kind, command.number, None)?;
        warn_if_beyond_convention(&story_id, &kind);

        let chapter = Chapter::new(story_id, kind, command.visibility, command.title)?;
        let chapter_id = *chapter.id();

        let outcome = settle(
            self.story_repo.as_ref(),
            &mut story,
            &chapters,
            ChapterChange::Upsert(chapter),
            ChapterEvent::created(story_id),
        )
        .await?;

        tracing::info!(
            story_id = %story_id,
            chapter_id = %chapter_id,
            kind = %kind,
            status_after = %outcome.status_after,
            "Chapter created"
        );

        Ok(CreateChapterResponse {
            chapter_id: *chapter_id.as_uuid(),
            story_id: *story_id.as_uuid(),
            kind,
            story_status_after: outcome.status_after,
            publish_prompt: outcome.publish_prompt,
            auto_drafted: outcome.auto_drafted,
        })
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// 更新章节响应
#[derive(Debug, Clone)]
pub struct UpdateChapterResponse {
    pub chapter_id: Uuid,
    pub story_id: Uuid,
    pub kind: ChapterKind,
    pub story_status_after: StoryStatus,
    pub publish_prompt: bool,
    pub auto_drafted: bool,
}

/// UpdateChapter Handler
pub struct UpdateChapterHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    story_locks: Arc<dyn StoryLockPort>,
}

impl UpdateChapterHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, story_locks: Arc<dyn StoryLockPort>) -> Self {
        Self {
            story_repo,
            story_locks,
        }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<UpdateChapterResponse, ApplicationError> {
        let chapter_id = ChapterId::from_uuid(command.chapter_id);

        // 章节所属故事不可变，可在加锁前确定
        let story_id = *require_chapter(self.story_repo.as_ref(), chapter_id)
            .await?
            .story_id();
        let _lock = self.story_locks.acquire(story_id).await;

        let mut story = require_story(self.story_repo.as_ref(), story_id).await?;
        let chapters = self.story_repo.find_chapters_by_story(story_id).await?;
        let mut chapter = take_locked_chapter(&chapters, chapter_id)?;

        let slots = SlotState::compute(&chapters, Some(&chapter_id));
        let kind = slots.resolve(command.kind, command.number, Some(chapter.kind()))?;
        warn_if_beyond_convention(&story_id, &kind);

        chapter.revise(kind, command.visibility);
        if let Some(title) = command.title {
            chapter.rename(Some(title))?;
        }

        let outcome = settle(
            self.story_repo.as_ref(),
            &mut story,
            &chapters,
            ChapterChange::Upsert(chapter),
            ChapterEvent::visibility_changed(story_id),
        )
        .await?;

        tracing::info!(
            story_id = %story_id,
            chapter_id = %chapter_id,
            kind = %kind,
            visibility = command.visibility.as_str(),
            status_after = %outcome.status_after,
            "Chapter updated"
        );

        Ok(UpdateChapterResponse {
            chapter_id: *chapter_id.as_uuid(),
            story_id: *story_id.as_uuid(),
            kind,
            story_status_after: outcome.status_after,
            publish_prompt: outcome.publish_prompt,
            auto_drafted: outcome.auto_drafted,
        })
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// 删除章节响应
#[derive(Debug, Clone)]
pub struct DeleteChapterResponse {
    pub chapter_id: Uuid,
    pub story_id: Uuid,
    pub story_status_after: StoryStatus,
    pub auto_drafted: bool,
    pub publish_prompt: bool,
}

/// DeleteChapter Handler
pub struct DeleteChapterHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
    story_locks: Arc<dyn StoryLockPort>,
}

impl DeleteChapterHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>, story_locks: Arc<dyn StoryLockPort>) -> Self {
        Self {
            story_repo,
            story_locks,
        }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<DeleteChapterResponse, ApplicationError> {
        let chapter_id = ChapterId::from_uuid(command.chapter_id);

        let story_id = *require_chapter(self.story_repo.as_ref(), chapter_id)
            .await?
            .story_id();
        let _lock = self.story_locks.acquire(story_id).await;

        let mut story = require_story(self.story_repo.as_ref(), story_id).await?;
        let chapters = self.story_repo.find_chapters_by_story(story_id).await?;
        let chapter = take_locked_chapter(&chapters, chapter_id)?;

        let outcome = settle(
            self.story_repo.as_ref(),
            &mut story,
            &chapters,
            ChapterChange::Delete(chapter_id),
            ChapterEvent::deleted(story_id),
        )
        .await?;

        tracing::info!(
            story_id = %story_id,
            chapter_id = %chapter_id,
            kind = %chapter.kind(),
            status_after = %outcome.status_after,
            auto_drafted = outcome.auto_drafted,
            "Chapter deleted"
        );

        Ok(DeleteChapterResponse {
            chapter_id: *chapter_id.as_uuid(),
            story_id: *story_id.as_uuid(),
            story_status_after: outcome.status_after,
            auto_drafted: outcome.auto_drafted,
            publish_prompt: outcome.publish_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::{CreateStory, PublishStory};
    use crate::application::commands::handlers::{CreateStoryHandler, PublishStoryHandler};
    use crate::domain::chapter::{qualifying_visible_count, ChapterNumber, SlotError, SlotKind, Visibility};
    use crate::infrastructure::memory::{InMemoryStoryLocks, InMemoryStoryRepository};

    struct Fixture {
        repo: Arc<InMemoryStoryRepository>,
        create: CreateChapterHandler,
        update: UpdateChapterHandler,
        delete: DeleteChapterHandler,
        create_story: CreateStoryHandler,
        publish: PublishStoryHandler,
    }

    impl Fixture {
        fn new() -> Self {
            let repo = Arc::new(InMemoryStoryRepository::new());
            let locks = Arc::new(InMemoryStoryLocks::new());
            Self {
                create: CreateChapterHandler::new(repo.clone(), locks.clone()),
                update: UpdateChapterHandler::new(repo.clone(), locks.clone()),
                delete: DeleteChapterHandler::new(repo.clone(), locks.clone()),
                create_story: CreateStoryHandler::new(repo.clone()),
                publish: PublishStoryHandler::new(repo.clone(), locks),
                repo,
            }
        }

        async fn story(&self) -> Uuid {
            self.create_story
                .handle(CreateStory {
                    title: "北方以北".to_string(),
                })
                .await
                .unwrap()
                .id
        }

        async fn publish(&self, story_id: Uuid) -> StoryStatus {
            self.publish
                .handle(PublishStory { story_id })
                .await
                .unwrap()
                .story_status_after
        }

        async fn add(
            &self,
            story_id: Uuid,
            kind: SlotKind,
            number: Option<i64>,
            visibility: Visibility,
        ) -> Result<CreateChapterResponse, ApplicationError> {
            self.create
                .handle(CreateChapter {
                    story_id,
                    kind,
                    number,
                    visibility,
                    title: None,
                })
                .await
        }

        async fn status(&self, story_id: Uuid) -> StoryStatus {
            self.repo
                .find_story(StoryId::from_uuid(story_id))
                .await
                .unwrap()
                .unwrap()
                .status()
        }

        async fn qualifying(&self, story_id: Uuid) -> usize {
            let chapters = self
                .repo
                .find_chapters_by_story(StoryId::from_uuid(story_id))
                .await
                .unwrap();
            qualifying_visible_count(&chapters)
        }
    }

    #[tokio::test]
    async fn test_first_visible_chapter_prompts_without_publishing() {
        let fx = Fixture::new();
        let story_id = fx.story().await;

        let created = fx
            .add(story_id, SlotKind::Numbered, Some(1), Visibility::Published)
            .await
            .unwrap();

        assert!(created.publish_prompt);
        assert!(!created.auto_drafted);
        assert_eq!(created.story_status_after, StoryStatus::Draft);
        assert_eq!(fx.qualifying(story_id).await, 1);
        assert_eq!(fx.status(story_id).await, StoryStatus::Draft);

        assert_eq!(fx.publish(story_id).await, StoryStatus::Published);
        assert_eq!(fx.status(story_id).await, StoryStatus::Published);
    }

    #[tokio::test]
    async fn test_deleting_sole_qualifying_chapter_auto_drafts() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let chapter = fx
            .add(story_id, SlotKind::Numbered, Some(1), Visibility::Published)
            .await
            .unwrap();
        fx.publish(story_id).await;

        let deleted = fx
            .delete
            .handle(DeleteChapter {
                chapter_id: chapter.chapter_id,
            })
            .await
            .unwrap();

        assert_eq!(deleted.story_status_after, StoryStatus::Draft);
        assert!(deleted.auto_drafted);
        assert_eq!(fx.status(story_id).await, StoryStatus::Draft);
    }

    #[tokio::test]
    async fn test_deleting_one_of_two_keeps_published() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let first = fx
            .add(story_id, SlotKind::Numbered, Some(1), Visibility::Published)
            .await
            .unwrap();
        fx.add(story_id, SlotKind::Numbered, Some(2), Visibility::Published)
            .await
            .unwrap();
        fx.publish(story_id).await;

        let deleted = fx
            .delete
            .handle(DeleteChapter {
                chapter_id: first.chapter_id,
            })
            .await
            .unwrap();

        assert_eq!(deleted.story_status_after, StoryStatus::Published);
        assert!(!deleted.auto_drafted);
    }

    #[tokio::test]
    async fn test_epilogue_never_moves_status() {
        let fx = Fixture::new();
        let story_id = fx.story().await;

        let epilogue = fx
            .add(story_id, SlotKind::Epilogue, None, Visibility::Published)
            .await
            .unwrap();
        assert!(!epilogue.publish_prompt);
        assert_eq!(epilogue.story_status_after, StoryStatus::Draft);

        let hidden = fx
            .update
            .handle(UpdateChapter {
                chapter_id: epilogue.chapter_id,
                kind: SlotKind::Epilogue,
                number: None,
                visibility: Visibility::Hidden,
                title: None,
            })
            .await
            .unwrap();
        assert!(!hidden.publish_prompt);
        assert!(!hidden.auto_drafted);

        let deleted = fx
            .delete
            .handle(DeleteChapter {
                chapter_id: epilogue.chapter_id,
            })
            .await
            .unwrap();
        assert!(!deleted.auto_drafted);
        assert_eq!(fx.status(story_id).await, StoryStatus::Draft);
    }

    #[tokio::test]
    async fn test_double_delete_is_not_found() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let chapter = fx
            .add(story_id, SlotKind::Prologue, None, Visibility::Hidden)
            .await
            .unwrap();

        let command = DeleteChapter {
            chapter_id: chapter.chapter_id,
        };
        fx.delete.handle(command.clone()).await.unwrap();
        let second = fx.delete.handle(command).await;

        assert!(matches!(second, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_prologue_and_epilogue_rejected() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        fx.add(story_id, SlotKind::Prologue, None, Visibility::Hidden)
            .await
            .unwrap();
        fx.add(story_id, SlotKind::Epilogue, None, Visibility::Hidden)
            .await
            .unwrap();

        let prologue = fx.add(story_id, SlotKind::Prologue, None, Visibility::Hidden).await;
        assert!(matches!(
            prologue,
            Err(ApplicationError::InvalidSlot(SlotError::PrologueTaken))
        ));

        let epilogue = fx.add(story_id, SlotKind::Epilogue, None, Visibility::Hidden).await;
        assert!(matches!(
            epilogue,
            Err(ApplicationError::InvalidSlot(SlotError::EpilogueTaken))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_and_non_positive_numbers_rejected() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        fx.add(story_id, SlotKind::Numbered, Some(1), Visibility::Hidden)
            .await
            .unwrap();

        let taken = fx.add(story_id, SlotKind::Numbered, Some(1), Visibility::Hidden).await;
        assert!(matches!(
            taken,
            Err(ApplicationError::InvalidSlot(SlotError::NumberTaken(_)))
        ));

        let zero = fx.add(story_id, SlotKind::Numbered, Some(0), Visibility::Hidden).await;
        assert!(matches!(
            zero,
            Err(ApplicationError::InvalidSlot(SlotError::InvalidNumber(0)))
        ));
    }

    #[tokio::test]
    async fn test_missing_number_uses_suggestion() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        fx.add(story_id, SlotKind::Numbered, Some(1), Visibility::Hidden)
            .await
            .unwrap();
        fx.add(story_id, SlotKind::Numbered, Some(3), Visibility::Hidden)
            .await
            .unwrap();

        let created = fx
            .add(story_id, SlotKind::Numbered, None, Visibility::Hidden)
            .await
            .unwrap();
        assert_eq!(
            created.kind,
            ChapterKind::Numbered(ChapterNumber::new(2).unwrap())
        );
    }

    #[tokio::test]
    async fn test_update_does_not_collide_with_itself() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let prologue = fx
            .add(story_id, SlotKind::Prologue, None, Visibility::Hidden)
            .await
            .unwrap();
        let numbered = fx
            .add(story_id, SlotKind::Numbered, Some(4), Visibility::Hidden)
            .await
            .unwrap();

        let same_prologue = fx
            .update
            .handle(UpdateChapter {
                chapter_id: prologue.chapter_id,
                kind: SlotKind::Prologue,
                number: None,
                visibility: Visibility::Published,
                title: Some("序".to_string()),
            })
            .await
            .unwrap();
        assert!(same_prologue.publish_prompt);

        let same_number = fx
            .update
            .handle(UpdateChapter {
                chapter_id: numbered.chapter_id,
                kind: SlotKind::Numbered,
                number: None,
                visibility: Visibility::Published,
                title: None,
            })
            .await
            .unwrap();
        assert_eq!(
            same_number.kind,
            ChapterKind::Numbered(ChapterNumber::new(4).unwrap())
        );
        assert!(!same_number.publish_prompt);
    }

    #[tokio::test]
    async fn test_update_into_taken_slot_rejected() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        fx.add(story_id, SlotKind::Prologue, None, Visibility::Hidden)
            .await
            .unwrap();
        let numbered = fx
            .add(story_id, SlotKind::Numbered, Some(1), Visibility::Hidden)
            .await
            .unwrap();

        let result = fx
            .update
            .handle(UpdateChapter {
                chapter_id: numbered.chapter_id,
                kind: SlotKind::Prologue,
                number: None,
                visibility: Visibility::Hidden,
                title: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::InvalidSlot(SlotError::PrologueTaken))
        ));
    }

    #[tokio::test]
    async fn test_hiding_last_qualifying_chapter_auto_drafts() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let chapter = fx
            .add(story_id, SlotKind::Prologue, None, Visibility::Published)
            .await
            .unwrap();
        fx.publish(story_id).await;

        let hidden = fx
            .update
            .handle(UpdateChapter {
                chapter_id: chapter.chapter_id,
                kind: SlotKind::Prologue,
                number: None,
                visibility: Visibility::Hidden,
                title: None,
            })
            .await
            .unwrap();

        assert!(hidden.auto_drafted);
        assert_eq!(hidden.story_status_after, StoryStatus::Draft);
    }

    #[tokio::test]
    async fn test_turning_last_numbered_into_epilogue_auto_drafts() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let chapter = fx
            .add(story_id, SlotKind::Numbered, Some(1), Visibility::Published)
            .await
            .unwrap();
        fx.publish(story_id).await;

        let converted = fx
            .update
            .handle(UpdateChapter {
                chapter_id: chapter.chapter_id,
                kind: SlotKind::Epilogue,
                number: None,
                visibility: Visibility::Published,
                title: None,
            })
            .await
            .unwrap();

        assert!(converted.auto_drafted);
        assert_eq!(converted.kind, ChapterKind::Epilogue);
    }

    #[tokio::test]
    async fn test_hidden_chapter_on_empty_published_story_auto_drafts() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        // 显式发布不检查合格章节数
        fx.publish(story_id).await;

        let created = fx
            .add(story_id, SlotKind::Numbered, None, Visibility::Hidden)
            .await
            .unwrap();

        assert!(created.auto_drafted);
        assert_eq!(fx.status(story_id).await, StoryStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_in_missing_story_is_not_found() {
        let fx = Fixture::new();
        let result = fx
            .add(Uuid::new_v4(), SlotKind::Prologue, None, Visibility::Hidden)
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_deletes_of_two_qualifying_chapters_draft_once() {
        let fx = Arc::new(Fixture::new());
        let story_id = fx.story().await;
        let a = fx
            .add(story_id, SlotKind::Numbered, Some(1), Visibility::Published)
            .await
            .unwrap();
        let b = fx
            .add(story_id, SlotKind::Numbered, Some(2), Visibility::Published)
            .await
            .unwrap();
        fx.publish(story_id).await;

        let spawn_delete = |chapter_id: Uuid| {
            let fx = fx.clone();
            tokio::spawn(async move { fx.delete.handle(DeleteChapter { chapter_id }).await })
        };
        let (ra, rb) = tokio::join!(spawn_delete(a.chapter_id), spawn_delete(b.chapter_id));
        let ra = ra.unwrap().unwrap();
        let rb = rb.unwrap().unwrap();

        // 恰好第二个执行的删除触发自动草稿
        assert_eq!(
            [ra.auto_drafted, rb.auto_drafted].iter().filter(|d| **d).count(),
            1
        );
        assert_eq!(fx.status(story_id).await, StoryStatus::Draft);
        assert_eq!(fx.qualifying(story_id).await, 0);
    }

    #[tokio::test]
    async fn test_published_implies_qualifying_after_every_mutation() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let p = fx
            .add(story_id, SlotKind::Prologue, None, Visibility::Published)
            .await
            .unwrap();
        let n = fx
            .add(story_id, SlotKind::Numbered, None, Visibility::Published)
            .await
            .unwrap();
        fx.add(story_id, SlotKind::Epilogue, None, Visibility::Published)
            .await
            .unwrap();
        fx.publish(story_id).await;

        let check = |status: StoryStatus, qualifying: usize| {
            assert!(!status.is_published() || qualifying >= 1);
        };

        fx.update
            .handle(UpdateChapter {
                chapter_id: p.chapter_id,
                kind: SlotKind::Prologue,
                number: None,
                visibility: Visibility::Hidden,
                title: None,
            })
            .await
            .unwrap();
        check(fx.status(story_id).await, fx.qualifying(story_id).await);
        assert_eq!(fx.status(story_id).await, StoryStatus::Published);

        fx.delete
            .handle(DeleteChapter {
                chapter_id: n.chapter_id,
            })
            .await
            .unwrap();
        check(fx.status(story_id).await, fx.qualifying(story_id).await);
        assert_eq!(fx.status(story_id).await, StoryStatus::Draft);
    }

    #[tokio::test]
    async fn test_maximum_number_leaves_story_writable() {
        let fx = Fixture::new();
        let story_id = fx.story().await;
        let top = i64::from(u32::MAX);

        let last = fx
            .add(story_id, SlotKind::Numbered, Some(top), Visibility::Hidden)
            .await
            .unwrap();
        assert_eq!(last.kind, ChapterKind::Numbered(ChapterNumber::new(top).unwrap()));

        let write_ops = async {
            fx.add(story_id, SlotKind::Prologue, None, Visibility::Hidden)
                .await
                .unwrap();
            let suggested = fx
                .add(story_id, SlotKind::Numbered, None, Visibility::Published)
                .await
                .unwrap();
            assert_eq!(
                suggested.kind,
                ChapterKind::Numbered(ChapterNumber::new(1).unwrap())
            );

            let updated = fx
                .update
                .handle(UpdateChapter {
                    chapter_id: last.chapter_id,
                    kind: SlotKind::Numbered,
                    number: None,
                    visibility: Visibility::Published,
                    title: Some("终章".to_string()),
                })
                .await
                .unwrap();
            assert_eq!(updated.kind, last.kind);

            let taken = fx
                .add(story_id, SlotKind::Numbered, Some(top), Visibility::Hidden)
                .await;
            assert!(matches!(
                taken,
                Err(ApplicationError::InvalidSlot(SlotError::NumberTaken(_)))
            ));
        };

        tokio::time::timeout(std::time::Duration::from_secs(5), write_ops)
            .await
            .expect("writes after the maximum number should stay fast");
    }
}
