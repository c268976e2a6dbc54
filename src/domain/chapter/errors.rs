//! Chapter Context - Errors

use thiserror::Error;

use super::ChapterNumber;

/// 槽位冲突或非法编号
///
/// 每个变体都能映射到具体的表单字段
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("该故事已有序章")]
    PrologueTaken,

    #[error("该故事已有尾声")]
    EpilogueTaken,

    #[error("章节编号 {0} 已被占用")]
    NumberTaken(ChapterNumber),

    #[error("章节编号必须为正整数: {0}")]
    InvalidNumber(i64),
}

impl SlotError {
    /// 出错的表单字段
    pub fn field(&self) -> &'static str {
        match self {
            SlotError::PrologueTaken | SlotError::EpilogueTaken => "kind",
            SlotError::NumberTaken(_) | SlotError::InvalidNumber(_) => "number",
        }
    }
}

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("无效的章节标题: {0}")]
    InvalidTitle(String),

    #[error("无效的章节类型: {0}")]
    InvalidKind(String),

    #[error(transparent)]
    Slot(#[from] SlotError),
}
