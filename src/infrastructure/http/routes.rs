//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                      GET   健康检查
//! - /api/story/create              POST  创建故事（草稿）
//! - /api/story/get                 POST  获取故事详情
//! - /api/story/list                GET   列出所有故事
//! - /api/story/publish             POST  显式发布故事
//! - /api/story/delete              POST  删除故事（级联章节）
//! - /api/chapter/slots             POST  查询可用槽位
//! - /api/chapter/last_qualifying   POST  最后合格章节检查（提示用）
//! - /api/chapter/create            POST  创建章节
//! - /api/chapter/update            POST  更新章节
//! - /api/chapter/delete            POST  删除章节
//! - /api/chapter/get               POST  获取章节详情
//! - /api/chapter/list              POST  按展示顺序列出章节
//! - /ws/events                     WS    全局 WebSocket（发布信号）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::global_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/story", story_routes())
        .nest("/chapter", chapter_routes())
}

/// Story 路由
fn story_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_story))
        .route("/get", post(handlers::get_story))
        .route("/list", get(handlers::list_stories))
        .route("/publish", post(handlers::publish_story))
        .route("/delete", post(handlers::delete_story))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/slots", post(handlers::fetch_slots))
        .route("/last_qualifying", post(handlers::check_last_qualifying))
        .route("/create", post(handlers::create_chapter))
        .route("/update", post(handlers::update_chapter))
        .route("/delete", post(handlers::delete_chapter))
        .route("/get", post(handlers::get_chapter))
        .route("/list", post(handlers::list_chapters))
}
