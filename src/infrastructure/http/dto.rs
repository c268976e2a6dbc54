//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    ChapterResponse, CreateChapterResponse, DeleteChapterResponse, LastQualifyingResponse,
    SlotStateResponse, StoryResponse, UpdateChapterResponse,
};
use crate::domain::chapter::{ChapterKind, OrderKey, SlotKind, Visibility};
use crate::domain::story::StoryStatus;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Story DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    pub title: String,
}

/// get / publish / delete 共用
#[derive(Debug, Deserialize)]
pub struct StoryIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct StoryDto {
    pub id: Uuid,
    pub title: String,
    pub status: StoryStatus,
    pub chapter_count: usize,
    pub qualifying_visible_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StoryResponse> for StoryDto {
    fn from(r: StoryResponse) -> Self {
        Self {
            id: r.id,
            title: r.title,
            status: r.status,
            chapter_count: r.chapter_count,
            qualifying_visible_count: r.qualifying_visible_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateStoryDto {
    pub id: Uuid,
    pub title: String,
    pub status: StoryStatus,
}

#[derive(Debug, Serialize)]
pub struct PublishStoryDto {
    pub story_id: Uuid,
    pub story_status_after: StoryStatus,
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SlotStateRequest {
    pub story_id: Uuid,
    #[serde(default)]
    pub excluding_chapter_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SlotStateDto {
    pub story_id: Uuid,
    pub available_numbers: Vec<u32>,
    pub prologue_taken: bool,
    pub epilogue_taken: bool,
    pub suggested_number: u32,
}

impl From<SlotStateResponse> for SlotStateDto {
    fn from(r: SlotStateResponse) -> Self {
        Self {
            story_id: r.story_id,
            available_numbers: r.available_numbers,
            prologue_taken: r.prologue_taken,
            epilogue_taken: r.epilogue_taken,
            suggested_number: r.suggested_number,
        }
    }
}

/// last_qualifying / get / delete 共用
#[derive(Debug, Deserialize)]
pub struct ChapterIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LastQualifyingDto {
    pub chapter_id: Uuid,
    pub is_last: bool,
    pub degraded: bool,
}

impl From<LastQualifyingResponse> for LastQualifyingDto {
    fn from(r: LastQualifyingResponse) -> Self {
        Self {
            chapter_id: r.chapter_id,
            is_last: r.is_last,
            degraded: r.degraded,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub story_id: Uuid,
    pub kind: SlotKind,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub id: Uuid,
    pub kind: SlotKind,
    #[serde(default)]
    pub number: Option<i64>,
    pub visibility: Visibility,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListChaptersRequest {
    pub story_id: Uuid,
}

/// 章节写操作的统一响应（携带发布信号）
#[derive(Debug, Serialize)]
pub struct ChapterMutationDto {
    pub chapter_id: Uuid,
    pub story_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SlotKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_key: Option<OrderKey>,
    pub story_status_after: StoryStatus,
    pub publish_prompt: bool,
    pub auto_drafted: bool,
}

impl ChapterMutationDto {
    fn with_kind(
        chapter_id: Uuid,
        story_id: Uuid,
        kind: &ChapterKind,
        story_status_after: StoryStatus,
        publish_prompt: bool,
        auto_drafted: bool,
    ) -> Self {
        Self {
            chapter_id,
            story_id,
            kind: Some(kind.slot()),
            number: kind.number().map(|n| n.get()),
            order_key: Some(kind.order_key()),
            story_status_after,
            publish_prompt,
            auto_drafted,
        }
    }
}

impl From<CreateChapterResponse> for ChapterMutationDto {
    fn from(r: CreateChapterResponse) -> Self {
        Self::with_kind(
            r.chapter_id,
            r.story_id,
            &r.kind,
            r.story_status_after,
            r.publish_prompt,
            r.auto_drafted,
        )
    }
}

impl From<UpdateChapterResponse> for ChapterMutationDto {
    fn from(r: UpdateChapterResponse) -> Self {
        Self::with_kind(
            r.chapter_id,
            r.story_id,
            &r.kind,
            r.story_status_after,
            r.publish_prompt,
            r.auto_drafted,
        )
    }
}

impl From<DeleteChapterResponse> for ChapterMutationDto {
    fn from(r: DeleteChapterResponse) -> Self {
        Self {
            chapter_id: r.chapter_id,
            story_id: r.story_id,
            kind: None,
            number: None,
            order_key: None,
            story_status_after: r.story_status_after,
            publish_prompt: r.publish_prompt,
            auto_drafted: r.auto_drafted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterDto {
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

impl From<ChapterResponse> for ChapterDto {
    fn from(r: ChapterResponse) -> Self {
        Self {
            id: r.id,
            story_id: r.story_id,
            title: r.title,
            display_title: r.display_title,
            kind: r.kind,
            number: r.number,
            visibility: r.visibility,
            order_key: r.order_key,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
