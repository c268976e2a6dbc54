//! Chapter Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ordering::{order_key, OrderKey};
use super::{ChapterError, SlotError};

/// 章节唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(Uuid);

impl ChapterId {
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

impl Default for ChapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ChapterId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 正文章节编号（≥ 1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ChapterNumber(u32);

impl ChapterNumber {
    pub const FIRST: ChapterNumber = ChapterNumber(1);

    /// 约定上正文编号应保持在尾声哨兵值之下
    pub const CONVENTIONAL_MAX: u32 = 999;

    pub fn new(n: i64) -> Result<Self, SlotError> {
        match u32::try_from(n) {
            Ok(n) if n >= 1 => Ok(Self(n)),
            _ => Err(SlotError::InvalidNumber(n)),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// 是否超出约定范围（与尾声排序哨兵重叠）
    pub fn exceeds_convention(&self) -> bool {
        self.0 > Self::CONVENTIONAL_MAX
    }
}

impl TryFrom<i64> for ChapterNumber {
    type Error = SlotError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<ChapterNumber> for u32 {
    fn from(n: ChapterNumber) -> Self {
        n.0
    }
}

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 槽位类别（不含编号）
///
/// 用于请求与持久化中的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Prologue,
    Numbered,
    Epilogue,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Prologue => "prologue",
            SlotKind::Numbered => "numbered",
            SlotKind::Epilogue => "epilogue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "prologue" => Some(SlotKind::Prologue),
            "numbered" => Some(SlotKind::Numbered),
            "epilogue" => Some(SlotKind::Epilogue),
            _ => None,
        }
    }
}

/// 章节类型：封闭的三变体联合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum ChapterKind {
    Prologue,
    Numbered(ChapterNumber),
    Epilogue,
}

impl ChapterKind {
    pub fn slot(&self) -> SlotKind {
        match self {
            ChapterKind::Prologue => SlotKind::Prologue,
            ChapterKind::Numbered(_) => SlotKind::Numbered,
            ChapterKind::Epilogue => SlotKind::Epilogue,
        }
    }

    pub fn number(&self) -> Option<ChapterNumber> {
        match self {
            ChapterKind::Numbered(n) => Some(*n),
            ChapterKind::Prologue | ChapterKind::Epilogue => None,
        }
    }

    /// 序章与正文计入发布资格，尾声永不计入
    pub fn is_qualifying(&self) -> bool {
        match self {
            ChapterKind::Prologue | ChapterKind::Numbered(_) => true,
            ChapterKind::Epilogue => false,
        }
    }

    pub fn order_key(&self) -> OrderKey {
        order_key(self)
    }

    /// 从持久化的 (类型标签, 编号) 还原
    pub fn from_parts(slot: &str, number: Option<i64>) -> Result<Self, ChapterError> {
        let slot = SlotKind::from_str(slot)
            .ok_or_else(|| ChapterError::InvalidKind(slot.to_string()))?;
        match slot {
            SlotKind::Prologue => Ok(ChapterKind::Prologue),
            SlotKind::Epilogue => Ok(ChapterKind::Epilogue),
            SlotKind::Numbered => {
                let n = number.ok_or_else(|| {
                    ChapterError::InvalidKind("numbered chapter without number".to_string())
                })?;
                Ok(ChapterKind::Numbered(ChapterNumber::new(n)?))
            }
        }
    }
}

impl std::fmt::Display for ChapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChapterKind::Prologue => f.write_str("Prologue"),
            ChapterKind::Numbered(n) => write!(f, "Chapter {}", n),
            ChapterKind::Epilogue => f.write_str("Epilogue"),
        }
    }
}

/// 章节对读者的可见性
///
/// 外部的 draft/pending 等状态统一折叠为 Hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Published,
    #[default]
    Hidden,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Published => "published",
            Visibility::Hidden => "hidden",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Visibility::Published),
            "hidden" => Some(Visibility::Hidden),
            _ => None,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Visibility::Published)
    }
}
