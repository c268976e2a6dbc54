//! Chapter Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ordering::OrderKey;
use super::{ChapterError, ChapterId, ChapterKind, Visibility};
use crate::domain::story::StoryId;

/// 章节
///
/// 不变量:
/// - 归属的故事在创建后不可变
/// - kind 的唯一性由槽位分配器在写入前校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    story_id: StoryId,
    title: Option<String>,
    kind: ChapterKind,
    visibility: Visibility,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Chapter {
    pub const MAX_TITLE_CHARS: usize = 200;

    pub fn new(
        story_id: StoryId,
        kind: ChapterKind,
        visibility: Visibility,
        title: Option<String>,
    ) -> Result<Self, ChapterError> {
        let now = Utc::now();
        Ok(Self {
            id: ChapterId::new(),
            story_id,
            title: normalize_title(title)?,
            kind,
            visibility,
            created_at: now,
            updated_at: now,
        })
    }

    /// 从持久化数据重建
    pub fn restore(
        id: ChapterId,
        story_id: StoryId,
        title: Option<String>,
        kind: ChapterKind,
        visibility: Visibility,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            story_id,
            title,
            kind,
            visibility,
            created_at,
            updated_at,
        }
    }

    /// 修改类型与可见性（调用方负责先通过槽位校验）
    pub fn revise(&mut self, kind: ChapterKind, visibility: Visibility) {
        self.kind = kind;
        self.visibility = visibility;
        self.updated_at = Utc::now();
    }

    pub fn rename(&mut self, title: Option<String>) -> Result<(), ChapterError> {
        self.title = normalize_title(title)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 是否为「合格可见章节」
    pub fn is_qualifying_visible(&self) -> bool {
        self.kind.is_qualifying() && self.visibility.is_published()
    }

    /// 展示标题：未命名时按类型生成
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self.kind.to_string(),
        }
    }

    // Getters
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    pub fn story_id(&self) -> &StoryId {
        &self.story_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn kind(&self) -> &ChapterKind {
        &self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn order_key(&self) -> OrderKey {
        self.kind.order_key()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn normalize_title(title: Option<String>) -> Result<Option<String>, ChapterError> {
    let Some(title) = title else {
        return Ok(None);
    };
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > Chapter::MAX_TITLE_CHARS {
        return Err(ChapterError::InvalidTitle(format!(
            "标题长度不能超过{}字符",
            Chapter::MAX_TITLE_CHARS
        )));
    }
    Ok(Some(trimmed.to_string()))
}
