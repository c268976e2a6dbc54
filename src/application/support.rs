//! 命令 / 查询处理器共享的加载与提交逻辑

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterChange, StoryRepositoryPort};
use crate::domain::chapter::{qualifying_visible_count, Chapter, ChapterId, ChapterKind};
use crate::domain::story::{ChapterEvent, PublicationOutcome, Story, StoryId};

pub(crate) async fn require_story(
    repo: &dyn StoryRepositoryPort,
    story_id: StoryId,
) -> Result<Story, ApplicationError> {
    repo.find_story(story_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Story", *story_id.as_uuid()))
}

pub(crate) async fn require_chapter(
    repo: &dyn StoryRepositoryPort,
    chapter_id: ChapterId,
) -> Result<Chapter, ApplicationError> {
    repo.find_chapter(chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", *chapter_id.as_uuid()))
}

/// 在故事写锁内取出目标章节
///
/// 加锁前读到的章节可能已被另一个写者删除
pub(crate) fn take_locked_chapter(
    chapters: &[Chapter],
    chapter_id: ChapterId,
) -> Result<Chapter, ApplicationError> {
    chapters
        .iter()
        .find(|c| c.id() == &chapter_id)
        .cloned()
        .ok_or_else(|| ApplicationError::not_found("Chapter", *chapter_id.as_uuid()))
}

/// 把章节变更应用到快照上，得到变更后的章节集合
fn apply_change(chapters: &[Chapter], change: &ChapterChange) -> Vec<Chapter> {
    match change {
        ChapterChange::Upsert(updated) => {
            let mut next: Vec<Chapter> = chapters
                .iter()
                .filter(|c| c.id() != updated.id())
                .cloned()
                .collect();
            next.push(updated.clone());
            next
        }
        ChapterChange::Delete(id) => chapters.iter().filter(|c| c.id() != id).cloned().collect(),
    }
}

/// 提交章节变更并执行一次发布状态机转移
///
/// 调用方必须已持有该故事的写锁；`chapters` 为加锁后读取的快照。
/// 章节写入与故事状态写入在同一次仓储提交中完成。
pub(crate) async fn settle(
    repo: &dyn StoryRepositoryPort,
    story: &mut Story,
    chapters: &[Chapter],
    change: ChapterChange,
    event: ChapterEvent,
) -> Result<PublicationOutcome, ApplicationError> {
    let before = qualifying_visible_count(chapters);
    let after = qualifying_visible_count(&apply_change(chapters, &change));

    let outcome = story.apply_chapter_event(&event, before, after);
    let story_write = outcome.status_changed().then_some(&*story);

    repo.commit_chapter_change(&change, story_write).await?;

    if outcome.auto_drafted {
        tracing::info!(
            story_id = %story.id(),
            event = event.kind.as_str(),
            "Story auto-drafted: no qualifying visible chapter left"
        );
    } else if outcome.publish_prompt {
        tracing::info!(
            story_id = %story.id(),
            event = event.kind.as_str(),
            "Story became eligible for publishing"
        );
    }

    Ok(outcome)
}

/// 编号进入尾声哨兵范围时提示（约定而非硬性约束）
pub(crate) fn warn_if_beyond_convention(story_id: &StoryId, kind: &ChapterKind) {
    if let ChapterKind::Numbered(n) = kind {
        if n.exceeds_convention() {
            tracing::warn!(
                story_id = %story_id,
                number = n.get(),
                "Chapter number reaches the epilogue ordering range"
            );
        }
    }
}
