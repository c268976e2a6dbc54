//! 可见性聚合

use super::Chapter;

/// 合格可见章节数：类型为序章/正文且已发布
///
/// 每次都从当前章节集合重新计算，不缓存计数
pub fn qualifying_visible_count(chapters: &[Chapter]) -> usize {
    chapters.iter().filter(|c| c.is_qualifying_visible()).count()
}
