//! Typed dispatch events
//!
//! Decodes the `d` payload of a dispatch frame according to its `t` name, so the
//! handlers work on validated structures instead of probing raw JSON.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::payloads::{
    ChannelPayload, GuildCreateEvent, MessageDeleteEvent, MessagePayload, MessageUpdateEvent,
    ReadyEvent, UnavailableGuild,
};
use super::{GatewayEventType, ProtocolAnomaly};

/// Decoded dispatch event
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    Ready(Box<ReadyEvent>),
    GuildCreate(Box<GuildCreateEvent>),
    GuildDelete(UnavailableGuild),
    ChannelCreate(ChannelPayload),
    ChannelUpdate(ChannelPayload),
    ChannelDelete(ChannelPayload),
    MessageCreate(Box<MessagePayload>),
    MessageUpdate(Box<MessageUpdateEvent>),
    MessageDelete(MessageDeleteEvent),
    /// An event this client has no handler for; carries the raw event name
    Unknown(String),
}

impl DispatchEvent {
    /// Decode a dispatch payload
    ///
    /// Unknown event names are not an error: the protocol adds events over time.
    pub fn decode(event_type: &str, data: Value) -> Result<Self, ProtocolAnomaly> {
        let Some(kind) = GatewayEventType::from_str(event_type) else {
            return Ok(Self::Unknown(event_type.to_string()));
        };

        Ok(match kind {
            GatewayEventType::Ready => Self::Ready(parse(kind, data)?),
            GatewayEventType::GuildCreate => Self::GuildCreate(parse(kind, data)?),
            GatewayEventType::GuildDelete => Self::GuildDelete(parse(kind, data)?),
            GatewayEventType::ChannelCreate => Self::ChannelCreate(parse(kind, data)?),
            GatewayEventType::ChannelUpdate => Self::ChannelUpdate(parse(kind, data)?),
            GatewayEventType::ChannelDelete => Self::ChannelDelete(parse(kind, data)?),
            GatewayEventType::MessageCreate => Self::MessageCreate(parse(kind, data)?),
            GatewayEventType::MessageUpdate => Self::MessageUpdate(parse(kind, data)?),
            GatewayEventType::MessageDelete => Self::MessageDelete(parse(kind, data)?),
        })
    }
}

fn parse<T: DeserializeOwned>(kind: GatewayEventType, data: Value) -> Result<T, ProtocolAnomaly> {
    serde_json::from_value(data).map_err(|source| ProtocolAnomaly::MalformedPayload {
        event_type: kind.as_str(),
        source,
    })
}
