//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::RepositoryError;
use crate::domain::chapter::{ChapterError, SlotError};
use crate::domain::story::StoryError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 槽位冲突（不会自动重试）
    #[error("Invalid slot: {0}")]
    InvalidSlot(#[from] SlotError),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 持久化失败，原样向上传递
    #[error("Persistence error: {0}")]
    PersistenceError(#[from] RepositoryError),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoryError> for ApplicationError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::InvalidTitle(msg) => Self::ValidationError(msg),
        }
    }
}

impl From<ChapterError> for ApplicationError {
    fn from(err: ChapterError) -> Self {
        match err {
            ChapterError::Slot(slot) => Self::InvalidSlot(slot),
            ChapterError::InvalidTitle(msg) | ChapterError::InvalidKind(msg) => {
                Self::ValidationError(msg)
            }
        }
    }
}
