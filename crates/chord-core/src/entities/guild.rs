//! Guild entity - represents a server and the entities nested inside it

use crate::cache::Cache;
use crate::value_objects::Snowflake;

use super::{Channel, Member, Role};

/// Guild (server) entity
///
/// Populated incrementally: READY registers an unavailable placeholder, GUILD_CREATE
/// replaces it with the full guild and its nested members, channels and roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub owner_id: Option<Snowflake>,
    pub unavailable: bool,
    pub member_count: Option<u64>,
    pub members: Cache<Member>,
    pub channels: Cache<Channel>,
    pub roles: Cache<Role>,
}

impl Guild {
    /// Create a new, available Guild
    pub fn new(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            icon: None,
            owner_id: None,
            unavailable: false,
            member_count: None,
            members: Cache::new(),
            channels: Cache::new(),
            roles: Cache::new(),
        }
    }

    /// Placeholder for a guild announced in READY but not yet delivered
    pub fn unavailable(id: impl Into<Snowflake>) -> Self {
        Self {
            id: id.into(),
            name: None,
            icon: None,
            owner_id: None,
            unavailable: true,
            member_count: None,
            members: Cache::new(),
            channels: Cache::new(),
            roles: Cache::new(),
        }
    }

    /// Check if a user is the guild owner
    #[inline]
    pub fn is_owner(&self, user_id: &Snowflake) -> bool {
        self.owner_id.as_ref() == Some(user_id)
    }

    /// Get the guild icon URL if set
    pub fn icon_url(&self, cdn_base: &str) -> Option<String> {
        self.icon.as_ref().map(|hash| {
            format!(
                "{}/icons/{}/{}.png",
                cdn_base.trim_end_matches('/'),
                self.id,
                hash
            )
        })
    }

    /// Member count reported by the server, falling back to the cached members
    pub fn total_members(&self) -> u64 {
        self.member_count
            .unwrap_or_else(|| self.members.size() as u64)
    }
}
