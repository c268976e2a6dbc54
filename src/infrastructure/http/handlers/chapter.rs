//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CheckLastQualifying, CreateChapter, DeleteChapter, FetchSlotState, GetChapter, ListChapters,
    UpdateChapter,
};
use crate::infrastructure::http::dto::{
    ApiResponse, ChapterDto, ChapterIdRequest, ChapterMutationDto, CreateChapterRequest,
    LastQualifyingDto, ListChaptersRequest, SlotStateDto, SlotStateRequest, UpdateChapterRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 查询可用槽位（表单初始化）
pub async fn fetch_slots(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SlotStateRequest>,
) -> Result<Json<ApiResponse<SlotStateDto>>, ApiError> {
    let slots = state
        .fetch_slot_state_handler
        .handle(FetchSlotState {
            story_id: req.story_id,
            excluding_chapter_id: req.excluding_chapter_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(slots.into())))
}

/// 删除/隐藏前的提示性检查
pub async fn check_last_qualifying(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<LastQualifyingDto>>, ApiError> {
    let check = state
        .check_last_qualifying_handler
        .handle(CheckLastQualifying { chapter_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(check.into())))
}

/// 创建章节
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterMutationDto>>, ApiError> {
    let created = state
        .create_chapter_handler
        .handle(CreateChapter {
            story_id: req.story_id,
            kind: req.kind,
            number: req.number,
            visibility: req.visibility,
            title: req.title,
        })
        .await?;

    state.event_publisher.publish_chapter_outcome(
        created.story_id,
        created.chapter_id,
        created.auto_drafted,
        created.publish_prompt,
    );

    Ok(Json(ApiResponse::success(created.into())))
}

/// 更新章节（类型、编号、可见性、标题）
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterMutationDto>>, ApiError> {
    let updated = state
        .update_chapter_handler
        .handle(UpdateChapter {
            chapter_id: req.id,
            kind: req.kind,
            number: req.number,
            visibility: req.visibility,
            title: req.title,
        })
        .await?;

    state.event_publisher.publish_chapter_outcome(
        updated.story_id,
        updated.chapter_id,
        updated.auto_drafted,
        updated.publish_prompt,
    );

    Ok(Json(ApiResponse::success(updated.into())))
}

/// 删除章节
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<ChapterMutationDto>>, ApiError> {
    let deleted = state
        .delete_chapter_handler
        .handle(DeleteChapter { chapter_id: req.id })
        .await?;

    state.event_publisher.publish_chapter_outcome(
        deleted.story_id,
        deleted.chapter_id,
        deleted.auto_drafted,
        deleted.publish_prompt,
    );

    Ok(Json(ApiResponse::success(deleted.into())))
}

/// 获取章节详情
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterIdRequest>,
) -> Result<Json<ApiResponse<ChapterDto>>, ApiError> {
    let chapter = state
        .get_chapter_handler
        .handle(GetChapter { chapter_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 按展示顺序列出章节
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListChaptersRequest>,
) -> Result<Json<ApiResponse<Vec<ChapterDto>>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(ListChapters {
            story_id: req.story_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        chapters.into_iter().map(ChapterDto::from).collect(),
    )))
}
