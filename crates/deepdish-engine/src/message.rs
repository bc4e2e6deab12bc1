//! Conversation messages.

use serde::{Deserialize, Serialize};

/// Text appended when the answer service cannot be reached or its reply
/// cannot be read.
pub const ERROR_MESSAGE: &str = "An error occurred while fetching data.";

/// Text appended when the answer service replies without a usable result.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing queries.
    User,
    /// The answer service.
    Bot,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A single entry in the conversation history.
///
/// Messages are never edited once they are part of a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub sender: Sender,
    /// Message text, exactly as submitted or received.
    pub text: String,
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    /// Whether this message was written by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
