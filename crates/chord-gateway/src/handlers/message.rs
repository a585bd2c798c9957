//! MESSAGE_CREATE / MESSAGE_UPDATE / MESSAGE_DELETE handlers
//!
//! Messages live in the flat channel cache. Events for channels or messages that are
//! not cached are anomalies: reported, never applied.

use chord_core::{Attachment, User};

use super::GatewayState;
use crate::events::mappers::message_from_payload;
use crate::events::payloads::{MessageDeleteEvent, MessagePayload, MessageUpdateEvent};
use crate::events::{ClientEvent, GatewayEventType, ProtocolAnomaly};

pub(crate) fn handle_message_create(
    state: &mut GatewayState,
    payload: MessagePayload,
    out: &mut Vec<ClientEvent>,
) -> Result<(), ProtocolAnomaly> {
    let store = &mut state.store;

    let Some(channel_guild) = store
        .channels
        .get(&payload.channel_id)
        .map(|channel| channel.guild_id.clone())
    else {
        return Err(ProtocolAnomaly::UnknownChannel {
            event_type: GatewayEventType::MessageCreate.as_str(),
            channel_id: payload.channel_id,
        });
    };

    let mut message = message_from_payload(payload, |user| store.upsert_user(user));
    if message.guild_id.is_none() {
        message.guild_id = channel_guild;
    }

    tracing::debug!(
        message_id = %message.id,
        channel_id = %message.channel_id,
        author_id = %message.author.id,
        "Message cached"
    );

    store.insert_message(message.clone());
    out.push(ClientEvent::Message(Box::new(message)));
    Ok(())
}

/// Merge the fields present in the update into the cached message
pub(crate) fn handle_message_update(
    state: &mut GatewayState,
    event: MessageUpdateEvent,
) -> Result<(), ProtocolAnomaly> {
    let store = &mut state.store;
    let event_type = GatewayEventType::MessageUpdate.as_str();

    if store.message(&event.channel_id, &event.id).is_none() {
        return Err(if store.channels.contains(&event.channel_id) {
            ProtocolAnomaly::UnknownMessage {
                event_type,
                channel_id: event.channel_id,
                message_id: event.id,
            }
        } else {
            ProtocolAnomaly::UnknownChannel {
                event_type,
                channel_id: event.channel_id,
            }
        });
    }

    let mentions: Option<Vec<User>> = event.mentions.map(|users| {
        users
            .into_iter()
            .map(|user| store.upsert_user(User::from(user)))
            .collect()
    });

    let Some(message) = store
        .channels
        .get_mut(&event.channel_id)
        .and_then(|channel| channel.messages.get_mut(&event.id))
    else {
        return Ok(());
    };

    if let Some(content) = event.content {
        message.content = content;
    }
    if event.edited_timestamp.is_some() {
        message.edited_timestamp = event.edited_timestamp;
    }
    if let Some(embeds) = event.embeds {
        message.embeds = embeds;
    }
    if let Some(attachments) = event.attachments {
        message.attachments = attachments.into_iter().map(Attachment::from).collect();
    }
    if let Some(mentions) = mentions {
        message.mentions = mentions;
    }

    tracing::debug!(message_id = %message.id, channel_id = %message.channel_id, "Message updated");
    Ok(())
}

pub(crate) fn handle_message_delete(
    state: &mut GatewayState,
    event: MessageDeleteEvent,
    out: &mut Vec<ClientEvent>,
) -> Result<(), ProtocolAnomaly> {
    let store = &mut state.store;
    let event_type = GatewayEventType::MessageDelete.as_str();

    if !store.channels.contains(&event.channel_id) {
        return Err(ProtocolAnomaly::UnknownChannel {
            event_type,
            channel_id: event.channel_id,
        });
    }

    let Some(removed) = store.remove_message(&event.channel_id, &event.id) else {
        return Err(ProtocolAnomaly::UnknownMessage {
            event_type,
            channel_id: event.channel_id,
            message_id: event.id,
        });
    };

    tracing::debug!(message_id = %removed.id, channel_id = %removed.channel_id, "Message removed");
    out.push(ClientEvent::MessageDelete(Box::new(removed)));
    Ok(())
}
