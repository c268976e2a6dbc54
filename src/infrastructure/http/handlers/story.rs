//! Story HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CreateStory, DeleteStory, GetStory, ListStories, PublishStory};
use crate::infrastructure::http::dto::{
    ApiResponse, CreateStoryDto, CreateStoryRequest, Empty, PublishStoryDto, StoryDto,
    StoryIdRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建故事（草稿）
pub async fn create_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateStoryRequest>,
) -> Result<Json<ApiResponse<CreateStoryDto>>, ApiError> {
    let created = state
        .create_story_handler
        .handle(CreateStory { title: req.title })
        .await?;

    Ok(Json(ApiResponse::success(CreateStoryDto {
        id: created.id,
        title: created.title,
        status: created.status,
    })))
}

/// 获取故事详情
pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryIdRequest>,
) -> Result<Json<ApiResponse<StoryDto>>, ApiError> {
    let story = state
        .get_story_handler
        .handle(GetStory { story_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(story.into())))
}

/// 列出所有故事
pub async fn list_stories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<StoryDto>>>, ApiError> {
    let stories = state.list_stories_handler.handle(ListStories).await?;

    Ok(Json(ApiResponse::success(
        stories.into_iter().map(StoryDto::from).collect(),
    )))
}

/// 显式发布故事
pub async fn publish_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryIdRequest>,
) -> Result<Json<ApiResponse<PublishStoryDto>>, ApiError> {
    let published = state
        .publish_story_handler
        .handle(PublishStory { story_id: req.id })
        .await?;

    if published.changed {
        state.event_publisher.publish_story_published(published.story_id);
    }

    Ok(Json(ApiResponse::success(PublishStoryDto {
        story_id: published.story_id,
        story_status_after: published.story_status_after,
    })))
}

/// 删除故事及其全部章节
pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_story_handler
        .handle(DeleteStory { story_id: req.id })
        .await?;

    state.event_publisher.publish_story_deleted(req.id);

    Ok(Json(ApiResponse::ok()))
}
