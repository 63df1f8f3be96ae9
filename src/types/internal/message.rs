use std::fmt;
use std::str::FromStr;

use poem_openapi::Enum;

use crate::errors::InternalError;
use crate::types::db::{message, message_reply};

/// Status of a contact message in the admin inbox
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
    Pending,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(MessageStatus::Unread),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            "pending" => Ok(MessageStatus::Pending),
            other => Err(InternalError::parse("message_status", format!("unknown status '{}'", other))),
        }
    }
}

/// Contact form submission
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: Option<i32>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Reply appended to a message thread
#[derive(Debug, Clone)]
pub struct NewReply {
    pub message_id: i32,
    pub author_id: i32,
    pub content: String,
    pub is_admin: bool,
}

/// A message with its replies in thread order
#[derive(Debug, Clone)]
pub struct MessageThread {
    pub message: message::Model,
    pub replies: Vec<message_reply::Model>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_forms() {
        for status in [MessageStatus::Unread, MessageStatus::Read, MessageStatus::Replied, MessageStatus::Pending] {
            assert_eq!(status.as_str().parse::<MessageStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_parse_error() {
        let err = "archived".parse::<MessageStatus>().unwrap_err();
        assert!(err.to_string().contains("archived"));
    }
}
