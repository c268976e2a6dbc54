//! Chapter Queries

use uuid::Uuid;

/// 查询故事的槽位占用
#[derive(Debug, Clone)]
pub struct FetchSlotState {
    pub story_id: Uuid,
    /// 编辑章节时排除其自身
    pub excluding_chapter_id: Option<Uuid>,
}

/// 查询章节是否为最后一个合格可见章节（仅供提示）
#[derive(Debug, Clone)]
pub struct CheckLastQualifying {
    pub chapter_id: Uuid,
}

/// 获取章节详情
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: Uuid,
}

/// 按展示顺序列出故事的章节
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub story_id: Uuid,
}
