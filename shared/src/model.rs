use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// --- Typed IDs ---

macro_rules! numeric_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(UserId);
numeric_id!(MessageId);
numeric_id!(PhotoId);

/// Member profile as the server sends it. The core only reads the id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct User(pub serde_json::Value);

impl User {
    pub fn id(&self) -> Option<UserId> {
        self.0.get("id").and_then(serde_json::Value::as_i64).map(UserId)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_known_as: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_photo_url: Option<String>,
    pub recipient_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_known_as: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_photo_url: Option<String>,
    pub content: String,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_sent: Option<String>,
}

impl Message {
    /// Whether this message still needs a read receipt from `viewer`.
    pub fn is_unread_for(&self, viewer: UserId) -> bool {
        !self.is_read && self.recipient_id == viewer
    }
}

/// Body of a send-message request.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub recipient_id: Option<UserId>,
    pub content: String,
}

impl MessageDraft {
    pub fn new(recipient_id: UserId, content: impl Into<String>) -> Self {
        Self {
            recipient_id: Some(recipient_id),
            content: content.into(),
        }
    }
}

/// Member search filter. Values go to the server untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    pub min_age: u32,
    pub max_age: u32,
    pub gender: String,
    pub order_by: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LikesMode {
    /// Members who liked the caller.
    Likers,
    /// Members the caller liked.
    Likees,
}

impl LikesMode {
    /// Maps the exact flag strings used by list views; anything else is no mode.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "Likers" => Some(Self::Likers),
            "Likees" => Some(Self::Likees),
            _ => None,
        }
    }

    pub fn param_name(self) -> &'static str {
        match self {
            Self::Likers => "Likers",
            Self::Likees => "Likees",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MessageContainer {
    Inbox,
    Outbox,
    #[default]
    Unread,
}

impl MessageContainer {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Outbox => "Outbox",
            Self::Unread => "Unread",
        }
    }
}

impl fmt::Display for MessageContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message container: {0}")]
pub struct UnknownContainer(pub String);

impl FromStr for MessageContainer {
    type Err = UnknownContainer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Inbox" => Ok(Self::Inbox),
            "Outbox" => Ok(Self::Outbox),
            "Unread" => Ok(Self::Unread),
            other => Err(UnknownContainer(other.to_string())),
        }
    }
}
