//! # chord-core
//!
//! Domain layer containing the identifier type, the entity cache, and the entity models
//! reconstructed from gateway events. This crate performs no I/O.

pub mod cache;
pub mod entities;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use cache::Cache;
pub use entities::{
    Attachment, Channel, ChannelType, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia,
    Guild, Member, Message, MessageReference, Role, User, Webhook, DEFAULT_CDN_URL,
};
pub use value_objects::{Snowflake, SnowflakeParseError};
