//! Story Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoryError;

/// 故事唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(Uuid);

impl StoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for StoryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 故事标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTitle(String);

impl StoryTitle {
    pub const MAX_CHARS: usize = 200;

    pub fn new(title: impl Into<String>) -> Result<Self, StoryError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(StoryError::InvalidTitle("标题不能为空".to_string()));
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(StoryError::InvalidTitle(format!(
                "标题长度不能超过{}字符",
                Self::MAX_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 故事发布状态
///
/// 其他外部状态（pending/private 等）不在本核心范围内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// 草稿
    #[default]
    Draft,
    /// 已发布
    Published,
}

impl StoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Draft => "draft",
            StoryStatus::Published => "published",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(StoryStatus::Draft),
            "published" => Some(StoryStatus::Published),
            _ => None,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, StoryStatus::Published)
    }
}

impl std::fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        let title = StoryTitle::new("  长夜将明  ").unwrap();
        assert_eq!(title.as_str(), "长夜将明");
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(StoryTitle::new("   ").is_err());
    }

    #[test]
    fn test_title_length_counts_chars() {
        let ok = "字".repeat(StoryTitle::MAX_CHARS);
        assert!(StoryTitle::new(ok).is_ok());

        let too_long = "字".repeat(StoryTitle::MAX_CHARS + 1);
        assert!(StoryTitle::new(too_long).is_err());
    }

    #[test]
    fn test_status_str_mapping() {
        assert_eq!(StoryStatus::from_str("draft"), Some(StoryStatus::Draft));
        assert_eq!(StoryStatus::from_str("published"), Some(StoryStatus::Published));
        assert_eq!(StoryStatus::from_str("pending"), None);
        assert_eq!(StoryStatus::Published.as_str(), "published");
    }
}
