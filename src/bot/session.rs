use std::collections::HashMap;

use async_trait::async_trait;
use tempfile::TempPath;
use teloxide::types::ChatId;
use tokio::sync::Mutex;

/// A downloaded video waiting for the user's emoji choice. Owns its temp
/// file: dropping the entry deletes the file, so replacing or consuming
/// an entry can never leak the download.
pub struct PendingVideo {
    pub path: TempPath,
    pub media_type: String,
    pub extension: String,
}

/// Where the two-step conversation stands for one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingEmoji,
}

/// Per-chat pending-video storage. In-memory today; the trait keeps the
/// handlers independent of the backing store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a pending video, replacing (and thereby deleting) any
    /// previous one for the same chat.
    async fn put(&self, chat: ChatId, pending: PendingVideo);

    /// Remove and return the pending video, if any.
    async fn take(&self, chat: ChatId) -> Option<PendingVideo>;

    async fn contains(&self, chat: ChatId) -> bool;

    async fn state(&self, chat: ChatId) -> ChatState {
        if self.contains(chat).await {
            ChatState::AwaitingEmoji
        } else {
            ChatState::Idle
        }
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<ChatId, PendingVideo>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, chat: ChatId, pending: PendingVideo) {
        // The replaced entry, if any, drops here and removes its file.
        self.entries.lock().await.insert(chat, pending);
    }

    async fn take(&self, chat: ChatId) -> Option<PendingVideo> {
        self.entries.lock().await.remove(&chat)
    }

    async fn contains(&self, chat: ChatId) -> bool {
        self.entries.lock().await.contains_key(&chat)
    }
}
