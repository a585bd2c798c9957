//! CHANNEL_CREATE / CHANNEL_UPDATE / CHANNEL_DELETE handlers

use chord_core::Channel;

use super::GatewayState;
use crate::events::payloads::ChannelPayload;

/// Insert or replace a channel, keeping any messages already cached for it
pub(crate) fn handle_channel_upsert(state: &mut GatewayState, payload: ChannelPayload) {
    let store = &mut state.store;
    let mut channel = Channel::from(payload);

    if let Some(mut previous) = store.channels.remove(&channel.id) {
        channel.inherit_messages(&mut previous);
    }

    if let Some(guild) = channel
        .guild_id
        .as_ref()
        .and_then(|guild_id| store.guilds.get_mut(guild_id))
    {
        guild
            .channels
            .set(channel.id.clone(), channel.without_messages());
    }

    tracing::debug!(
        channel_id = %channel.id,
        guild_id = ?channel.guild_id,
        kind = channel.kind.as_u8(),
        "Channel cached"
    );

    store.channels.set(channel.id.clone(), channel);
}

pub(crate) fn handle_channel_delete(state: &mut GatewayState, payload: ChannelPayload) {
    let store = &mut state.store;
    let removed = store.channels.remove(&payload.id);

    let guild_id = payload
        .guild_id
        .or_else(|| removed.and_then(|channel| channel.guild_id));

    if let Some(guild) = guild_id.and_then(|id| store.guilds.get_mut(&id)) {
        guild.channels.delete(&payload.id);
    }

    tracing::debug!(channel_id = %payload.id, "Channel removed");
}
