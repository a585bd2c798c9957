//! Shared gateway state
//!
//! Session and entity caches sit behind one mutex so a sequence update and the
//! cache mutation derived from the same frame are observed together.

use std::sync::Arc;

use chord_core::{Cache, Channel, Guild, Message, Snowflake, User};
use parking_lot::Mutex;

use crate::connection::Session;

/// Entity caches rebuilt from dispatch events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStore {
    pub users: Cache<User>,
    pub guilds: Cache<Guild>,
    /// Flat channel cache; the only place messages are stored
    pub channels: Cache<Channel>,
    pub current_user: Option<Snowflake>,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything; a fresh session rebuilds from READY
    pub fn reset(&mut self) {
        self.users.clear();
        self.guilds.clear();
        self.channels.clear();
        self.current_user = None;
    }

    /// Insert or refresh a user, returning the cached instance
    pub fn upsert_user(&mut self, user: User) -> User {
        self.users.set(user.id.clone(), user).clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref().and_then(|id| self.users.get(id))
    }

    #[must_use]
    pub fn message(&self, channel_id: &Snowflake, message_id: &Snowflake) -> Option<&Message> {
        self.channels
            .get(channel_id)
            .and_then(|channel| channel.messages.get(message_id))
    }

    /// Cache a message in its channel. Returns false when the channel is unknown.
    pub fn insert_message(&mut self, message: Message) -> bool {
        match self.channels.get_mut(&message.channel_id) {
            Some(channel) => {
                channel.messages.set(message.id.clone(), message);
                true
            }
            None => false,
        }
    }

    pub fn remove_message(
        &mut self,
        channel_id: &Snowflake,
        message_id: &Snowflake,
    ) -> Option<Message> {
        self.channels
            .get_mut(channel_id)
            .and_then(|channel| channel.messages.remove(message_id))
    }
}

/// Everything the dispatcher mutates
#[derive(Debug, Clone, Default)]
pub struct GatewayState {
    pub session: Session,
    pub store: EntityStore,
}

impl GatewayState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// State shared between the connection engine, the dispatcher and the client
pub type SharedState = Arc<Mutex<GatewayState>>;
