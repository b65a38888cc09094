use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::model::{Message, MessageId, UserId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // --- Session ---
    SessionStarted { config: ClientConfig, token: String },
    SessionEnded,

    // --- Message thread ---
    OpenThread { recipient_id: UserId },
    DraftChanged(String),
    SendMessage,
    CloseThread,

    // --- Profile editing ---
    ProfileEdited,
    SaveProfile(serde_json::Value),
    LeaveRequested,

    // --- Responses (internal) ---
    ThreadLoaded {
        recipient_id: UserId,
        result: ApiResult<Vec<Message>>,
    },
    ReadReceiptSent {
        message_id: MessageId,
        result: Result<(), String>,
    },
    MessageSent {
        recipient_id: UserId,
        result: ApiResult<Message>,
    },
    ProfileSaved(ApiResult<()>),
    LeaveDecided(bool),
}
