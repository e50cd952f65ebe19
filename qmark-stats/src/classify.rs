//! Valid / anomalous classification of channel messages.

use qmark_core::{Message, MessageKind};

/// The only content a valid message may have.
pub const VALID_CONTENT: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Valid,
    Anomalous,
}

/// Valid iff the content is exactly `"?"` and the message is a plain user post.
pub fn classify(message: &Message) -> Classification {
    if message.kind == MessageKind::Default && message.content == VALID_CONTENT {
        Classification::Valid
    } else {
        Classification::Anomalous
    }
}

/// A message tagged with its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub message: Message,
    pub classification: Classification,
}

impl Classified {
    pub fn new(message: Message) -> Self {
        let classification = classify(&message);
        Self {
            message,
            classification,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.classification == Classification::Valid
    }
}
