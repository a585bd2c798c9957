//! Dispatch event handlers
//!
//! Applies decoded Dispatch frames to the shared state and raises the resulting
//! notifications.

mod channel;
mod guild;
mod message;
mod notifier;
mod ready;
mod state;

pub use notifier::{Listener, Notifier};
pub use state::{EntityStore, GatewayState, SharedState};

use std::sync::Arc;

use serde_json::Value;

use crate::events::{ClientEvent, DispatchEvent, ProtocolAnomaly};

/// What happened to a Dispatch frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// READY applied; the session is ready
    Ready,
    /// Applied to the caches
    Applied,
    /// Event type not handled by this client
    Ignored,
    /// Reported through a `debug` notification, nothing applied
    Anomaly,
}

/// Routes Dispatch frames to their handlers
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    state: SharedState,
    notifier: Arc<Notifier>,
}

impl EventDispatcher {
    pub fn new(state: SharedState, notifier: Arc<Notifier>) -> Self {
        Self { state, notifier }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Process one Dispatch frame
    ///
    /// The sequence is recorded for every frame, before any cache mutation and under
    /// the same lock. Notifications are raised after the lock is released.
    pub fn dispatch(
        &self,
        event_type: Option<&str>,
        sequence: Option<u64>,
        data: Option<Value>,
    ) -> DispatchOutcome {
        let decoded = match event_type {
            Some(t) => DispatchEvent::decode(t, data.unwrap_or(Value::Null)),
            None => Err(ProtocolAnomaly::MissingEventType),
        };

        let mut notifications = Vec::new();
        let result = {
            let mut state = self.state.lock();
            state.session.record_sequence(sequence);
            decoded.and_then(|event| apply(&mut state, event, &mut notifications))
        };

        self.notifier.emit_all(notifications);

        match result {
            Ok(outcome) => {
                tracing::trace!(event_type = ?event_type, sequence = ?sequence, outcome = ?outcome, "Dispatch processed");
                outcome
            }
            Err(anomaly) => {
                self.notifier.debug(anomaly.to_string());
                DispatchOutcome::Anomaly
            }
        }
    }
}

fn apply(
    state: &mut GatewayState,
    event: DispatchEvent,
    out: &mut Vec<ClientEvent>,
) -> Result<DispatchOutcome, ProtocolAnomaly> {
    match event {
        DispatchEvent::Ready(ready) => {
            ready::handle_ready(state, *ready, out);
            return Ok(DispatchOutcome::Ready);
        }
        DispatchEvent::GuildCreate(guild) => guild::handle_guild_create(state, *guild),
        DispatchEvent::GuildDelete(guild) => guild::handle_guild_delete(state, guild),
        DispatchEvent::ChannelCreate(channel) | DispatchEvent::ChannelUpdate(channel) => {
            channel::handle_channel_upsert(state, channel);
        }
        DispatchEvent::ChannelDelete(channel) => channel::handle_channel_delete(state, channel),
        DispatchEvent::MessageCreate(payload) => {
            message::handle_message_create(state, *payload, out)?;
        }
        DispatchEvent::MessageUpdate(update) => message::handle_message_update(state, *update)?,
        DispatchEvent::MessageDelete(delete) => message::handle_message_delete(state, delete, out)?,
        DispatchEvent::Unknown(name) => {
            tracing::trace!(event_type = %name, "Ignoring unhandled dispatch event");
            return Ok(DispatchOutcome::Ignored);
        }
    }
    Ok(DispatchOutcome::Applied)
}
