//! READY handler

use chord_core::{Guild, User};

use super::GatewayState;
use crate::events::payloads::ReadyEvent;
use crate::events::ClientEvent;

/// Start a fresh session: reset the caches and seed them from READY
pub(crate) fn handle_ready(state: &mut GatewayState, event: ReadyEvent, out: &mut Vec<ClientEvent>) {
    let store = &mut state.store;
    store.reset();

    let user = store.upsert_user(User::from(event.user));
    store.current_user = Some(user.id.clone());

    for guild in event.guilds {
        let id = guild.id;
        store.guilds.set(id.clone(), Guild::unavailable(id));
    }

    state
        .session
        .mark_ready(event.session_id, event.resume_gateway_url);

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        guilds = state.store.guilds.size(),
        session_id = ?state.session.session_id,
        "Session ready"
    );

    out.push(ClientEvent::Ready(user));
}
