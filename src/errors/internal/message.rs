use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Message not found: {message_id}")]
    MessageNotFound { message_id: i32 },

    #[error("Reply not found: {reply_id}")]
    ReplyNotFound { reply_id: i32 },

    #[error("User {user_id} is not a participant of message {message_id}")]
    NotThreadParticipant { user_id: i32, message_id: i32 },
}
