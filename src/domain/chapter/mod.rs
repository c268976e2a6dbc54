//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节实体与封闭的三类章节类型
//! - 槽位分配与校验
//! - 展示排序键
//! - 合格可见章节聚合与最后章节守卫

mod entities;
mod errors;
mod guard;
mod ordering;
mod slots;
mod value_objects;
mod visibility;

pub use entities::Chapter;
pub use errors::{ChapterError, SlotError};
pub use guard::is_last_qualifying;
pub use ordering::{display_order, order_key, OrderKey, EPILOGUE_ORDER_KEY, PROLOGUE_ORDER_KEY};
pub use slots::SlotState;
pub use value_objects::{ChapterId, ChapterKind, ChapterNumber, SlotKind, Visibility};
pub use visibility::qualifying_visible_count;
