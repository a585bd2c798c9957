//! Member entity - a user's membership in a guild

use chrono::{DateTime, Utc};

use super::User;
use crate::value_objects::Snowflake;

/// Guild member: a [`User`] plus guild-scoped fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user: User,
    pub nick: Option<String>,
    pub role_ids: Vec<Snowflake>,
    pub joined_at: Option<DateTime<Utc>>,
    pub pending: bool,
}

impl Member {
    /// Create a new Member
    pub fn new(guild_id: impl Into<Snowflake>, user: User) -> Self {
        Self {
            guild_id: guild_id.into(),
            user,
            nick: None,
            role_ids: Vec::new(),
            joined_at: None,
            pending: false,
        }
    }

    /// The member's identifier (same as the underlying user)
    #[inline]
    pub fn id(&self) -> &Snowflake {
        &self.user.id
    }

    /// Get display name (nickname if set, otherwise the user's display name)
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .unwrap_or_else(|| self.user.display_name())
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: &Snowflake) -> bool {
        self.role_ids.contains(role_id)
    }
}
