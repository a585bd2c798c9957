//! GUILD_CREATE / GUILD_DELETE handlers

use chord_core::Guild;

use super::GatewayState;
use crate::events::mappers::guild_from_payload;
use crate::events::payloads::{GuildCreateEvent, UnavailableGuild};

/// Cache a full guild and mirror its channels into the flat channel cache
pub(crate) fn handle_guild_create(state: &mut GatewayState, event: GuildCreateEvent) {
    let guild = guild_from_payload(event);
    let store = &mut state.store;

    for member in guild.members.values() {
        store.users.set(member.user.id.clone(), member.user.clone());
    }

    for channel in guild.channels.values() {
        let mut mirrored = channel.without_messages();
        if let Some(mut previous) = store.channels.remove(&channel.id) {
            mirrored.inherit_messages(&mut previous);
        }
        store.channels.set(mirrored.id.clone(), mirrored);
    }

    tracing::debug!(
        guild_id = %guild.id,
        channels = guild.channels.size(),
        members = guild.members.size(),
        roles = guild.roles.size(),
        "Guild cached"
    );

    store.guilds.set(guild.id.clone(), guild);
}

/// Outage or removal
///
/// During an outage the guild becomes a placeholder again; on removal the guild and
/// its channels leave the caches.
pub(crate) fn handle_guild_delete(state: &mut GatewayState, event: UnavailableGuild) {
    let store = &mut state.store;
    let id = event.id;

    if event.unavailable {
        tracing::debug!(guild_id = %id, "Guild unavailable");
        store.guilds.set(id.clone(), Guild::unavailable(id));
        return;
    }

    store.guilds.delete(&id);
    store
        .channels
        .retain(|_, channel| channel.guild_id.as_ref() != Some(&id));
    tracing::debug!(guild_id = %id, "Guild removed");
}
