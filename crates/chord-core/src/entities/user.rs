//! User entity - represents an account seen through the gateway

use crate::value_objects::Snowflake;

/// Default CDN base used for avatar and icon URLs
pub const DEFAULT_CDN_URL: &str = "https://cdn.discordapp.com";

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub global_name: Option<String>,
    pub avatar: Option<String>,
    pub bot: bool,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: impl Into<Snowflake>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            discriminator: "0".to_string(),
            global_name: None,
            avatar: None,
            bot: false,
        }
    }

    /// Get the full tag: username#discriminator (or just the username for migrated accounts)
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }

    /// Mention string in the form `<@id>`
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Global display name if set, otherwise the username
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// Avatar URL under the given CDN base, or `None` when no avatar hash is set
    pub fn avatar_url(&self, cdn_base: &str) -> Option<String> {
        self.avatar.as_ref().map(|hash| {
            format!(
                "{}/avatars/{}/{}.png",
                cdn_base.trim_end_matches('/'),
                self.id,
                hash
            )
        })
    }

    /// Check if user is a bot account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }
}
