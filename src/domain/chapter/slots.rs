//! 章节槽位分配器
//!
//! 计算某个故事当前可用的 (类型, 编号) 组合，并校验请求的组合。
//! 编辑已有章节时通过 `excluding` 把该章节自身排除在占用之外。

use std::collections::BTreeSet;

use super::{Chapter, ChapterId, ChapterKind, ChapterNumber, SlotError, SlotKind};

/// 某个故事的槽位占用情况
///
/// 只保存已占用的编号；可用编号按需从占用集合的空洞中推导，
/// 开销只与章节数量有关，与最大编号无关。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotState {
    prologue_taken: bool,
    epilogue_taken: bool,
    used_numbers: BTreeSet<u32>,
}

impl SlotState {
    /// 可用编号列表中最多列出的空洞数量（`max_used + 1` 另计）
    pub const MAX_LISTED_GAPS: usize = 1000;

    /// 根据故事的全部章节计算槽位状态
    pub fn compute(chapters: &[Chapter], excluding: Option<&ChapterId>) -> Self {
        let mut prologue_taken = false;
        let mut epilogue_taken = false;
        let mut used_numbers = BTreeSet::new();

        for chapter in chapters {
            if excluding == Some(chapter.id()) {
                continue;
            }
            match chapter.kind() {
                ChapterKind::Prologue => prologue_taken = true,
                ChapterKind::Epilogue => epilogue_taken = true,
                ChapterKind::Numbered(n) => {
                    used_numbers.insert(n.get());
                }
            }
        }

        Self {
            prologue_taken,
            epilogue_taken,
            used_numbers,
        }
    }

    /// 可用编号（升序）：`{1 ..= max_used + 1} \ used`
    ///
    /// 空洞最多列出 `gap_limit` 个，`max_used + 1` 总是附在末尾，因此结果永不为空
    /// （除非 `max_used` 已是 `u32::MAX` 且没有空洞）。
    pub fn available_numbers(&self, gap_limit: usize) -> Vec<u32> {
        let mut available: Vec<u32> = self.gaps().take(gap_limit).collect();
        available.extend(self.next_after_max());
        available
    }

    pub fn prologue_taken(&self) -> bool {
        self.prologue_taken
    }

    pub fn epilogue_taken(&self) -> bool {
        self.epilogue_taken
    }

    /// 新章节的默认编号：最小可用编号
    pub fn suggested_number(&self) -> ChapterNumber {
        self.gaps()
            .next()
            .or_else(|| self.next_after_max())
            .and_then(|n| ChapterNumber::new(i64::from(n)).ok())
            .unwrap_or(ChapterNumber::FIRST)
    }

    /// 低于最大已用编号的空洞，升序且惰性生成
    fn gaps(&self) -> impl Iterator<Item = u32> + '_ {
        let mut previous = 0u32;
        self.used_numbers.iter().flat_map(move |&used| {
            // previous < used，不会溢出
            let start = previous + 1;
            previous = used;
            start..used
        })
    }

    fn next_after_max(&self) -> Option<u32> {
        match self.used_numbers.last() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// 校验一个完整的章节类型
    pub fn validate(&self, kind: &ChapterKind) -> Result<(), SlotError> {
        match kind {
            ChapterKind::Prologue if self.prologue_taken => Err(SlotError::PrologueTaken),
            ChapterKind::Epilogue if self.epilogue_taken => Err(SlotError::EpilogueTaken),
            ChapterKind::Numbered(n) if self.used_numbers.contains(&n.get()) => {
                Err(SlotError::NumberTaken(*n))
            }
            ChapterKind::Prologue | ChapterKind::Epilogue | ChapterKind::Numbered(_) => Ok(()),
        }
    }

    /// 把请求的 (槽位, 编号?) 解析为章节类型并校验
    ///
    /// 正文未给编号时：编辑已是正文的章节则沿用原编号，否则取建议编号。
    /// 序章 / 尾声忽略传入的编号。
    pub fn resolve(
        &self,
        slot: SlotKind,
        number: Option<i64>,
        current: Option<&ChapterKind>,
    ) -> Result<ChapterKind, SlotError> {
        let kind = match slot {
            SlotKind::Prologue => ChapterKind::Prologue,
            SlotKind::Epilogue => ChapterKind::Epilogue,
            SlotKind::Numbered => {
                let number = match (number, current.and_then(ChapterKind::number)) {
                    (Some(n), _) => ChapterNumber::new(n)?,
                    (None, Some(existing)) => existing,
                    (None, None) => self.suggested_number(),
                };
                ChapterKind::Numbered(number)
            }
        };

        self.validate(&kind)?;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapter::Visibility;
    use crate::domain::story::StoryId;

    fn chapter(story_id: StoryId, kind: ChapterKind) -> Chapter {
        Chapter::new(story_id, kind, Visibility::Hidden, None).unwrap()
    }

    fn numbered(n: i64) -> ChapterKind {
        ChapterKind::Numbered(ChapterNumber::new(n).unwrap())
    }

    fn story_with(kinds: &[ChapterKind]) -> Vec<Chapter> {
        let story_id = StoryId::new();
        kinds.iter().map(|k| chapter(story_id, *k)).collect()
    }

    #[test]
    fn test_empty_story_offers_first_number() {
        let state = SlotState::compute(&[], None);
        assert_eq!(state.available_numbers(SlotState::MAX_LISTED_GAPS), vec![1]);
        assert!(!state.prologue_taken());
        assert!(!state.epilogue_taken());
        assert_eq!(state.suggested_number().get(), 1);
    }

    #[test]
    fn test_gap_surfaces_first() {
        let chapters = story_with(&[numbered(1), numbered(3)]);
        let state = SlotState::compute(&chapters, None);
        assert_eq!(state.available_numbers(SlotState::MAX_LISTED_GAPS), vec![2, 4]);
        assert_eq!(state.suggested_number().get(), 2);
    }

    #[test]
    fn test_gap_after_two() {
        let chapters = story_with(&[numbered(1), numbered(2), numbered(4)]);
        let state = SlotState::compute(&chapters, None);
        assert_eq!(state.available_numbers(SlotState::MAX_LISTED_GAPS), vec![3, 5]);
        assert_eq!(state.suggested_number().get(), 3);
    }

    #[test]
    fn test_prologue_and_epilogue_flags() {
        let chapters = story_with(&[ChapterKind::Prologue, ChapterKind::Epilogue, numbered(1)]);
        let state = SlotState::compute(&chapters, None);
        assert!(state.prologue_taken());
        assert!(state.epilogue_taken());
        assert_eq!(state.available_numbers(SlotState::MAX_LISTED_GAPS), vec![2]);
    }

    #[test]
    fn test_excluding_frees_own_slot() {
        let chapters = story_with(&[ChapterKind::Prologue, numbered(1), numbered(2)]);
        let prologue_id = *chapters[0].id();
        let second_id = *chapters[2].id();

        let state = SlotState::compute(&chapters, Some(&prologue_id));
        assert!(!state.prologue_taken());
        assert!(state.validate(&ChapterKind::Prologue).is_ok());

        let state = SlotState::compute(&chapters, Some(&second_id));
        assert_eq!(state.available_numbers(SlotState::MAX_LISTED_GAPS), vec![2]);
        assert!(state.validate(&numbered(2)).is_ok());
    }

    #[test]
    fn test_validate_rejects_taken_slots() {
        let chapters = story_with(&[ChapterKind::Prologue, ChapterKind::Epilogue, numbered(5)]);
        let state = SlotState::compute(&chapters, None);

        assert_eq!(state.validate(&ChapterKind::Prologue), Err(SlotError::PrologueTaken));
        assert_eq!(state.validate(&ChapterKind::Epilogue), Err(SlotError::EpilogueTaken));
        assert_eq!(
            state.validate(&numbered(5)),
            Err(SlotError::NumberTaken(ChapterNumber::new(5).unwrap()))
        );
        assert!(state.validate(&numbered(3)).is_ok());
    }

    #[test]
    fn test_no_upper_bound_on_numbers() {
        let state = SlotState::compute(&[], None);
        assert!(state.validate(&numbered(5000)).is_ok());
    }

    #[test]
    fn test_resolve_defaults_and_rejections() {
        let chapters = story_with(&[numbered(1)]);
        let state = SlotState::compute(&chapters, None);

        assert_eq!(state.resolve(SlotKind::Numbered, None, None).unwrap(), numbered(2));
        assert_eq!(
            state.resolve(SlotKind::Numbered, Some(0), None),
            Err(SlotError::InvalidNumber(0))
        );
        assert_eq!(
            state.resolve(SlotKind::Prologue, Some(9), None).unwrap(),
            ChapterKind::Prologue
        );
        assert!(state.resolve(SlotKind::Numbered, Some(1), None).is_err());
    }

    #[test]
    fn test_resolve_keeps_existing_number_on_edit() {
        let chapters = story_with(&[numbered(1), numbered(7)]);
        let editing = chapters[1].clone();
        let state = SlotState::compute(&chapters, Some(editing.id()));

        let kind = state
            .resolve(SlotKind::Numbered, None, Some(editing.kind()))
            .unwrap();
        assert_eq!(kind, numbered(7));
    }

    #[test]
    fn test_huge_number_keeps_allocation_cheap() {
        let top = i64::from(u32::MAX);
        let chapters = story_with(&[numbered(top)]);
        let state = SlotState::compute(&chapters, None);

        assert_eq!(state.suggested_number().get(), 1);
        assert_eq!(state.available_numbers(3), vec![1, 2, 3]);
        assert_eq!(
            state.validate(&numbered(top)),
            Err(SlotError::NumberTaken(ChapterNumber::new(top).unwrap()))
        );
        assert!(state.validate(&numbered(7)).is_ok());
        assert_eq!(
            state.resolve(SlotKind::Numbered, None, None).unwrap(),
            numbered(1)
        );
    }

    #[test]
    fn test_listing_caps_gaps_but_keeps_next_number() {
        let chapters = story_with(&[numbered(1), numbered(20_000_000)]);
        let state = SlotState::compute(&chapters, None);

        let available = state.available_numbers(SlotState::MAX_LISTED_GAPS);
        assert_eq!(available.len(), SlotState::MAX_LISTED_GAPS + 1);
        assert_eq!(available[0], 2);
        assert_eq!(available[SlotState::MAX_LISTED_GAPS - 1], 1001);
        assert_eq!(available.last(), Some(&20_000_001));
    }

    #[test]
    fn test_first_gap_found_after_dense_prefix() {
        let kinds: Vec<ChapterKind> = (1..=50).map(numbered).chain([numbered(52)]).collect();
        let state = SlotState::compute(&story_with(&kinds), None);
        assert_eq!(state.suggested_number().get(), 51);
        assert_eq!(state.available_numbers(SlotState::MAX_LISTED_GAPS), vec![51, 53]);
    }
}
