//! Domain entities - objects reconstructed from gateway and REST payloads

mod channel;
mod embed;
mod guild;
mod member;
mod message;
mod role;
mod user;
mod webhook;

pub use channel::{Channel, ChannelType};
pub use embed::{Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia};
pub use guild::Guild;
pub use member::Member;
pub use message::{Attachment, Message, MessageReference};
pub use role::Role;
pub use user::{User, DEFAULT_CDN_URL};
pub use webhook::Webhook;
