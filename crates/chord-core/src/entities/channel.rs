//! Channel entity - represents a text channel, DM, category or thread

use crate::cache::Cache;
use crate::value_objects::Snowflake;

use super::Message;

/// Channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText,
    /// Direct message between users
    Dm,
    /// Guild voice channel
    GuildVoice,
    /// Direct message between multiple users
    GroupDm,
    /// Guild category for organizing channels
    GuildCategory,
    /// Announcement channel that can be followed
    GuildAnnouncement,
    /// Thread within an announcement channel
    AnnouncementThread,
    /// Public thread within a text channel
    PublicThread,
    /// Private thread within a text channel
    PrivateThread,
    /// Stage voice channel
    GuildStageVoice,
    /// Forum channel holding threads
    GuildForum,
    /// Type this client does not know about
    Unknown(u8),
}

impl ChannelType {
    /// Get the numeric value
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildVoice => 2,
            Self::GroupDm => 3,
            Self::GuildCategory => 4,
            Self::GuildAnnouncement => 5,
            Self::AnnouncementThread => 10,
            Self::PublicThread => 11,
            Self::PrivateThread => 12,
            Self::GuildStageVoice => 13,
            Self::GuildForum => 15,
            Self::Unknown(value) => value,
        }
    }

    /// Check if messages can be sent to channels of this type
    #[must_use]
    pub fn is_text_based(self) -> bool {
        matches!(
            self,
            Self::GuildText
                | Self::Dm
                | Self::GroupDm
                | Self::GuildAnnouncement
                | Self::AnnouncementThread
                | Self::PublicThread
                | Self::PrivateThread
                | Self::GuildVoice
        )
    }

    #[must_use]
    pub fn is_thread(self) -> bool {
        matches!(
            self,
            Self::AnnouncementThread | Self::PublicThread | Self::PrivateThread
        )
    }
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::GuildStageVoice,
            15 => Self::GuildForum,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(ct: ChannelType) -> Self {
        ct.as_u8()
    }
}

/// Channel entity
///
/// Owns the cache of messages observed in it. Messages are only cached on the copy held in
/// the client's flat channel cache; copies nested inside a guild carry channel metadata only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub kind: ChannelType,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub position: i32,
    pub parent_id: Option<Snowflake>,
    pub messages: Cache<Message>,
}

impl Channel {
    /// Create a new channel of the given type
    pub fn new(id: impl Into<Snowflake>, kind: ChannelType) -> Self {
        Self {
            id: id.into(),
            kind,
            guild_id: None,
            name: None,
            topic: None,
            position: 0,
            parent_id: None,
            messages: Cache::new(),
        }
    }

    /// Mention string in the form `<#id>`
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }

    /// Check if this channel belongs to a guild
    #[inline]
    pub fn is_guild_channel(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Copy of this channel without its message cache
    #[must_use]
    pub fn without_messages(&self) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            guild_id: self.guild_id.clone(),
            name: self.name.clone(),
            topic: self.topic.clone(),
            position: self.position,
            parent_id: self.parent_id.clone(),
            messages: Cache::new(),
        }
    }

    /// Take over the message cache of a previous instance of the same channel
    pub fn inherit_messages(&mut self, previous: &mut Channel) {
        if self.messages.is_empty() {
            self.messages = std::mem::take(&mut previous.messages);
        }
    }
}
