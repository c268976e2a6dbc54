//! Chapter Commands

use uuid::Uuid;

use crate::domain::chapter::{SlotKind, Visibility};

/// 创建章节命令
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub story_id: Uuid,
    pub kind: SlotKind,
    /// 仅对正文有意义；缺省时取建议编号
    pub number: Option<i64>,
    pub visibility: Visibility,
    pub title: Option<String>,
}

/// 更新章节命令
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub chapter_id: Uuid,
    pub kind: SlotKind,
    /// 缺省时沿用原编号（若原本即为正文）
    pub number: Option<i64>,
    pub visibility: Visibility,
    /// None 表示不修改标题
    pub title: Option<String>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: Uuid,
}
