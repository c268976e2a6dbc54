//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Story Context: 故事与发布状态机
//! - Chapter Context: 章节、槽位分配、排序与可见性聚合
//!
//! 领域层不做任何 IO，全部为基于当前章节快照的纯计算

pub mod chapter;
pub mod story;
