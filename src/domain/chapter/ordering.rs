//! 排序键
//!
//! 序章 → 0，正文 → 编号本身，尾声 → 固定哨兵 1000。
//! 排序键只用于展示，从不作为章节编号持久化。

use std::cmp::Ordering;

use super::ChapterKind;

pub type OrderKey = u32;

pub const PROLOGUE_ORDER_KEY: OrderKey = 0;
pub const EPILOGUE_ORDER_KEY: OrderKey = 1000;

pub fn order_key(kind: &ChapterKind) -> OrderKey {
    match kind {
        ChapterKind::Prologue => PROLOGUE_ORDER_KEY,
        ChapterKind::Numbered(n) => n.get(),
        ChapterKind::Epilogue => EPILOGUE_ORDER_KEY,
    }
}

/// 展示顺序比较
///
/// 编号 ≥ 1000 的正文会与尾声哨兵重合，此时尾声仍排在最后
pub fn display_order(a: &ChapterKind, b: &ChapterKind) -> Ordering {
    let is_epilogue = |k: &ChapterKind| matches!(k, ChapterKind::Epilogue);
    order_key(a)
        .cmp(&order_key(b))
        .then_with(|| is_epilogue(a).cmp(&is_epilogue(b)))
}
