//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现：发布状态信号的全局广播

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// 全局广播通道容量
const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 最后一个合格章节消失，故事被自动转为草稿
    StoryAutoDrafted {
        story_id: Uuid,
        chapter_id: Uuid,
    },
    /// 草稿故事出现第一个合格章节，可提示发布
    StoryPublishPrompt {
        story_id: Uuid,
        chapter_id: Uuid,
    },
    /// 故事被显式发布
    StoryPublished {
        story_id: Uuid,
    },
    /// 故事已删除
    StoryDeleted {
        story_id: Uuid,
    },
}

impl WsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WsEvent::StoryAutoDrafted { .. } => "StoryAutoDrafted",
            WsEvent::StoryPublishPrompt { .. } => "StoryPublishPrompt",
            WsEvent::StoryPublished { .. } => "StoryPublished",
            WsEvent::StoryDeleted { .. } => "StoryDeleted",
        }
    }
}

/// 事件发布器
pub struct EventPublisher {
    global_channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            global_channel: global_tx,
        }
    }

    /// 订阅全局事件
    pub fn subscribe_global(&self) -> broadcast::Receiver<WsEvent> {
        self.global_channel.subscribe()
    }

    /// 章节变更后的发布信号（两者至多一个为真）
    pub fn publish_chapter_outcome(
        &self,
        story_id: Uuid,
        chapter_id: Uuid,
        auto_drafted: bool,
        publish_prompt: bool,
    ) {
        if auto_drafted {
            self.publish(WsEvent::StoryAutoDrafted {
                story_id,
                chapter_id,
            });
        }
        if publish_prompt {
            self.publish(WsEvent::StoryPublishPrompt {
                story_id,
                chapter_id,
            });
        }
    }

    /// 发布故事已发布事件（仅在状态实际变化时调用）
    pub fn publish_story_published(&self, story_id: Uuid) {
        self.publish(WsEvent::StoryPublished { story_id });
    }

    /// 发布故事删除事件
    pub fn publish_story_deleted(&self, story_id: Uuid) {
        self.publish(WsEvent::StoryDeleted { story_id });
    }

    fn publish(&self, event: WsEvent) {
        let name = event.name();
        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(
                event = name,
                error = %e,
                "Failed to publish event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
