//! Chapter Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{RepositoryError, StoryRepositoryPort};
use crate::application::queries::{CheckLastQualifying, FetchSlotState, GetChapter, ListChapters};
use crate::application::support::{require_chapter, require_story};
use crate::domain::chapter::{
    display_order, is_last_qualifying, Chapter, ChapterId, OrderKey, SlotKind, SlotState,
    Visibility,
};
use crate::domain::story::StoryId;

// ============================================================================
// Response DTOs
// ============================================================================

/// 槽位状态响应
#[derive(Debug, Clone)]
pub struct SlotStateResponse {
    pub story_id: Uuid,
    /// 升序；空洞至多列出 `SlotState::MAX_LISTED_GAPS` 个，末尾总是 `max_used + 1`
    pub available_numbers: Vec<u32>,
    pub prologue_taken: bool,
    pub epilogue_taken: bool,
    /// 新章节的默认编号（最小可用编号）
    pub suggested_number: u32,
}

/// 最后合格章节检查响应
#[derive(Debug, Clone)]
pub struct LastQualifyingResponse {
    pub chapter_id: Uuid,
    pub is_last: bool,
    /// 检查失败时为 true，展示层应退回普通确认框
    pub degraded: bool,
}

/// 章节详情响应
#[derive(Debug, Clone)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub story_id: Uuid,
    pub title: Option<String>,
    pub display_title: String,
    pub kind: SlotKind,
    pub number: Option<u32>,
    pub visibility: Visibility,
    pub order_key: OrderKey,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Chapter> for ChapterResponse {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: *chapter.id().as_uuid(),
            story_id: *chapter.story_id().as_uuid(),
            title: chapter.title().map(str::to_string),
            display_title: chapter.display_title(),
            kind: chapter.kind().slot(),
            number: chapter.kind().number().map(|n| n.get()),
            visibility: chapter.visibility(),
            order_key: chapter.order_key(),
            created_at: chapter.created_at().to_rfc3339(),
            updated_at: chapter.updated_at().to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// FetchSlotState Handler
pub struct FetchSlotStateHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl FetchSlotStateHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: FetchSlotState) -> Result<SlotStateResponse, ApplicationError> {
        let story_id = StoryId::from_uuid(query.story_id);
        require_story(self.story_repo.as_ref(), story_id).await?;

        let chapters = self.story_repo.find_chapters_by_story(story_id).await?;
        let excluding = query.excluding_chapter_id.map(ChapterId::from_uuid);
        let slots = SlotState::compute(&chapters, excluding.as_ref());

        Ok(SlotStateResponse {
            story_id: query.story_id,
            available_numbers: slots.available_numbers(SlotState::MAX_LISTED_GAPS),
            prologue_taken: slots.prologue_taken(),
            epilogue_taken: slots.epilogue_taken(),
            suggested_number: slots.suggested_number().get(),
        })
    }
}

/// CheckLastQualifying Handler
///
/// 只读、不加锁；持久化故障不视为致命错误
pub struct CheckLastQualifyingHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl CheckLastQualifyingHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(
        &self,
        query: CheckLastQualifying,
    ) -> Result<LastQualifyingResponse, ApplicationError> {
        let chapter_id = ChapterId::from_uuid(query.chapter_id);

        let chapter = match self.story_repo.find_chapter(chapter_id).await {
            Ok(Some(chapter)) => chapter,
            Ok(None) => return Err(ApplicationError::not_found("Chapter", query.chapter_id)),
            Err(e) => return Ok(degraded(chapter_id, &e)),
        };

        let chapters = match self.story_repo.find_chapters_by_story(*chapter.story_id()).await {
            Ok(chapters) => chapters,
            Err(e) => return Ok(degraded(chapter_id, &e)),
        };

        Ok(LastQualifyingResponse {
            chapter_id: query.chapter_id,
            is_last: is_last_qualifying(&chapter, &chapters),
            degraded: false,
        })
    }
}

/// 检查失败：记录告警并让展示层退回普通确认框
fn degraded(chapter_id: ChapterId, error: &RepositoryError) -> LastQualifyingResponse {
    tracing::warn!(
        chapter_id = %chapter_id,
        error = %error,
        "Last-qualifying check degraded"
    );
    LastQualifyingResponse {
        chapter_id: *chapter_id.as_uuid(),
        is_last: false,
        degraded: true,
    }
}

/// GetChapter Handler
pub struct GetChapterHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterResponse, ApplicationError> {
        let chapter =
            require_chapter(self.story_repo.as_ref(), ChapterId::from_uuid(query.chapter_id))
                .await?;
        Ok(ChapterResponse::from(&chapter))
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<Vec<ChapterResponse>, ApplicationError> {
        let story_id = StoryId::from_uuid(query.story_id);
        require_story(self.story_repo.as_ref(), story_id).await?;

        let mut chapters = self.story_repo.find_chapters_by_story(story_id).await?;
        chapters.sort_by(|a, b| display_order(a.kind(), b.kind()));

        Ok(chapters.iter().map(ChapterResponse::from).collect())
    }
}
