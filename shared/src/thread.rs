//! Conversation between the signed-in member and one other member.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::model::{Message, MessageDraft, MessageId, UserId};

/// State behind the message thread on a member's detail page.
///
/// Owns its message list outright. Read receipts are fired by the app and
/// never touch this state, so one landing after the thread closed is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageThread {
    recipient_id: UserId,
    messages: Vec<Message>,
    draft: MessageDraft,
    error: Option<ApiError>,
}

impl MessageThread {
    pub fn new(recipient_id: UserId) -> Self {
        Self {
            recipient_id,
            messages: Vec::new(),
            draft: MessageDraft::new(recipient_id, ""),
            error: None,
        }
    }

    pub fn recipient_id(&self) -> UserId {
        self.recipient_id
    }

    /// Newest first once something has been sent from this view.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &MessageDraft {
        &self.draft
    }

    pub fn set_draft_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    /// Last failure, already in display form.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn record_error(&mut self, err: ApiError) {
        self.error = Some(err);
    }

    /// Applies a thread fetch and returns the messages that need a read
    /// receipt from `viewer`.
    ///
    /// Receipts are not deduplicated beyond the fetched `is_read` flag, so a
    /// reload before they land asks for them again. On failure the previous
    /// list stays and nothing needs a receipt.
    pub fn thread_loaded(
        &mut self,
        viewer: UserId,
        result: ApiResult<Vec<Message>>,
    ) -> Vec<MessageId> {
        let messages = match result {
            Ok(messages) => messages,
            Err(err) => {
                self.error = Some(err);
                return Vec::new();
            }
        };

        let unread: Vec<MessageId> = messages
            .iter()
            .filter(|m| m.is_unread_for(viewer))
            .map(|m| m.id)
            .collect();
        debug!(
            count = messages.len(),
            receipts = unread.len(),
            "message thread loaded"
        );

        self.messages = messages;
        self.error = None;
        unread
    }

    /// The draft as it goes out, addressed to the other member.
    pub fn outgoing(&mut self) -> &MessageDraft {
        self.draft.recipient_id = Some(self.recipient_id);
        &self.draft
    }

    /// On success the created message goes to the top of the list and the
    /// draft text is cleared; on failure the draft is kept.
    pub fn message_sent(&mut self, result: ApiResult<Message>) {
        match result {
            Ok(message) => {
                self.messages.insert(0, message);
                self.draft.content.clear();
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
    }

    pub fn view(&self, viewer: UserId) -> ThreadViewModel {
        ThreadViewModel {
            recipient_id: self.recipient_id,
            messages: self
                .messages
                .iter()
                .map(|m| MessageView::from_message(m, viewer))
                .collect(),
            draft_content: self.draft.content.clone(),
            can_send: !self.draft.content.trim().is_empty(),
            error: self.error.as_ref().map(|e| e.message().to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ThreadViewModel {
    pub recipient_id: UserId,
    pub messages: Vec<MessageView>,
    pub draft_content: String,
    pub can_send: bool,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub content: String,
    pub is_mine: bool,
    pub is_read: bool,
    pub sender_name: Option<String>,
    pub sender_photo_url: Option<String>,
    pub date_sent: Option<String>,
}

impl MessageView {
    fn from_message(message: &Message, viewer: UserId) -> Self {
        Self {
            id: message.id,
            content: message.content.clone(),
            is_mine: message.sender_id == viewer,
            is_read: message.is_read,
            sender_name: message.sender_known_as.clone(),
            sender_photo_url: message.sender_photo_url.clone(),
            date_sent: message.date_sent.clone(),
        }
    }
}
