//! 最后合格章节守卫
//!
//! 仅供展示层在「隐藏 / 删除」确认框中加重提示。
//! 结果可能在真正变更时已经过期，真正的自动草稿判定只在发布状态机里发生。

use super::visibility::qualifying_visible_count;
use super::Chapter;

/// 该章节是否独自维持着故事的发布资格
///
/// `chapters` 为该章节所属故事的全部章节
pub fn is_last_qualifying(chapter: &Chapter, chapters: &[Chapter]) -> bool {
    chapter.is_qualifying_visible() && qualifying_visible_count(chapters) == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapter::{ChapterKind, ChapterNumber, Visibility};
    use crate::domain::story::StoryId;

    fn numbered(story_id: StoryId, n: i64, visibility: Visibility) -> Chapter {
        Chapter::new(
            story_id,
            ChapterKind::Numbered(ChapterNumber::new(n).unwrap()),
            visibility,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_sole_qualifying_chapter_is_last() {
        let story_id = StoryId::new();
        let chapters = vec![
            numbered(story_id, 1, Visibility::Published),
            numbered(story_id, 2, Visibility::Hidden),
        ];
        assert!(is_last_qualifying(&chapters[0], &chapters));
        assert!(!is_last_qualifying(&chapters[1], &chapters));
    }

    #[test]
    fn test_two_qualifying_chapters_neither_is_last() {
        let story_id = StoryId::new();
        let chapters = vec![
            numbered(story_id, 1, Visibility::Published),
            numbered(story_id, 2, Visibility::Published),
        ];
        assert!(!is_last_qualifying(&chapters[0], &chapters));
    }

    #[test]
    fn test_epilogue_is_never_last() {
        let story_id = StoryId::new();
        let epilogue =
            Chapter::new(story_id, ChapterKind::Epilogue, Visibility::Published, None).unwrap();
        let chapters = vec![epilogue.clone(), numbered(story_id, 1, Visibility::Published)];
        assert!(!is_last_qualifying(&epilogue, &chapters));
        assert!(!is_last_qualifying(&epilogue, &chapters[..1]));
    }
}
