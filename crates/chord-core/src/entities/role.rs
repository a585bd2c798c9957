//! Role entity

use crate::value_objects::Snowflake;

/// Guild role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    pub color: u32,
    pub position: i32,
    pub permissions: u64,
    pub hoist: bool,
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    pub fn new(id: impl Into<Snowflake>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: 0,
            position: 0,
            permissions: 0,
            hoist: false,
            managed: false,
            mentionable: false,
        }
    }

    /// Mention string in the form `<@&id>`
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }

    /// The @everyone role shares its identifier with the guild
    pub fn is_everyone(&self, guild_id: &Snowflake) -> bool {
        &self.id == guild_id
    }

    /// Check a raw permission bit
    #[inline]
    pub fn has_permission(&self, bit: u64) -> bool {
        self.permissions & bit == bit
    }
}
