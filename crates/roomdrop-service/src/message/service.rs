//! Message posting service.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use roomdrop_core::error::AppError;
use roomdrop_core::result::AppResult;
use roomdrop_core::traits::storage::StorageProvider;
use roomdrop_entity::message::Message;
use roomdrop_storage::layout;

/// Posts immutable text messages into a room.
#[derive(Debug)]
pub struct MessageService {
    /// Provider owning room storage.
    provider: Arc<dyn StorageProvider>,
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Post a message into a room. Empty text is ignored (`Ok(None)`).
    ///
    /// The file name is derived from the posting timestamp down to the
    /// millisecond; the content is written once and never mutated.
    pub async fn post(&self, room: &str, text: &str) -> AppResult<Option<Message>> {
        if text.is_empty() {
            return Ok(None);
        }

        if !self.provider.exists(&layout::room_dir(room)).await? {
            return Err(AppError::not_found(format!("No room by the name '{room}'")));
        }

        let posted_at = Utc::now();
        let file_name = format!(
            "{}{}.txt",
            layout::MESSAGE_PREFIX,
            posted_at.format("%Y%m%d-%H%M%S%3f")
        );

        self.provider
            .write(
                &layout::room_entry(room, &file_name),
                Bytes::from(text.to_string()),
            )
            .await?;

        info!(room, file = %file_name, "Message posted");
        Ok(Some(Message {
            file_name,
            posted_at,
        }))
    }
}
