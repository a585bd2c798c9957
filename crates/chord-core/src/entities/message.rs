//! Message entity - represents a chat message

use chrono::{DateTime, Utc};

use super::{Embed, User};
use crate::value_objects::Snowflake;

/// Message entity
///
/// `author` and `mentions` are snapshots resolved from the user cache when the message was
/// built; later user updates are not reflected here. Channel and guild are referenced by
/// identifier and resolved through the client caches on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: User,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub edited_timestamp: Option<DateTime<Utc>>,
    pub tts: bool,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<Embed>,
    pub mentions: Vec<User>,
    pub reference: Option<MessageReference>,
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: impl Into<Snowflake>,
        channel_id: impl Into<Snowflake>,
        author: User,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            content: content.into(),
            timestamp: None,
            edited_timestamp: None,
            tts: false,
            attachments: Vec::new(),
            embeds: Vec::new(),
            mentions: Vec::new(),
            reference: None,
        }
    }

    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }

    /// Check if message is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.reference
            .as_ref()
            .is_some_and(|r| r.message_id.is_some())
    }

    /// Check if message was sent in a guild
    #[inline]
    pub fn in_guild(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Check whether a user is mentioned
    pub fn mentions_user(&self, user_id: &Snowflake) -> bool {
        self.mentions.iter().any(|u| &u.id == user_id)
    }

    /// Get a truncated preview of the message (for logs)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }

    /// Reference pointing at this message, for replies
    pub fn as_reference(&self) -> MessageReference {
        MessageReference {
            message_id: Some(self.id.clone()),
            channel_id: Some(self.channel_id.clone()),
            guild_id: self.guild_id.clone(),
        }
    }
}

/// Reference to another message (replies, crossposts)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageReference {
    pub message_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    pub guild_id: Option<Snowflake>,
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub url: String,
    pub proxy_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Attachment {
    /// Check if attachment is an image
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }

    /// Check if attachment is a video
    pub fn is_video(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("video/"))
    }

    /// Check if attachment has dimensions (is an image/video)
    pub fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}
