//! Payload -> entity mappers

use chord_core::{
    Attachment, Channel, ChannelType, Guild, Member, Message, MessageReference, Role, Snowflake,
    User,
};

use super::payloads::{
    AttachmentPayload, ChannelPayload, GuildCreateEvent, MemberPayload, MessagePayload,
    MessageReferencePayload, RolePayload, UserPayload,
};

/// Convert UserPayload to User entity
impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        User {
            id: payload.id,
            username: payload.username,
            discriminator: payload.discriminator.unwrap_or_else(|| "0".to_string()),
            global_name: payload.global_name,
            avatar: payload.avatar,
            bot: payload.bot,
        }
    }
}

impl From<RolePayload> for Role {
    fn from(payload: RolePayload) -> Self {
        Role {
            id: payload.id,
            name: payload.name,
            color: payload.color,
            position: payload.position,
            permissions: payload
                .permissions
                .and_then(|p| p.parse().ok())
                .unwrap_or(0),
            hoist: payload.hoist,
            managed: payload.managed,
            mentionable: payload.mentionable,
        }
    }
}

impl From<ChannelPayload> for Channel {
    fn from(payload: ChannelPayload) -> Self {
        let mut channel = Channel::new(payload.id, ChannelType::from(payload.kind));
        channel.guild_id = payload.guild_id;
        channel.name = payload.name;
        channel.topic = payload.topic;
        channel.position = payload.position.unwrap_or(0);
        channel.parent_id = payload.parent_id;
        channel
    }
}

impl From<AttachmentPayload> for Attachment {
    fn from(payload: AttachmentPayload) -> Self {
        Attachment {
            id: payload.id,
            filename: payload.filename,
            content_type: payload.content_type,
            size: payload.size,
            url: payload.url,
            proxy_url: payload.proxy_url,
            width: payload.width,
            height: payload.height,
        }
    }
}

impl From<MessageReferencePayload> for MessageReference {
    fn from(payload: MessageReferencePayload) -> Self {
        MessageReference {
            message_id: payload.message_id,
            channel_id: payload.channel_id,
            guild_id: payload.guild_id,
        }
    }
}

impl From<&MessageReference> for MessageReferencePayload {
    fn from(reference: &MessageReference) -> Self {
        MessageReferencePayload {
            message_id: reference.message_id.clone(),
            channel_id: reference.channel_id.clone(),
            guild_id: reference.guild_id.clone(),
        }
    }
}

/// Build a Member of `guild_id`, or `None` when the payload carries no user
pub fn member_from_payload(guild_id: &Snowflake, payload: MemberPayload) -> Option<Member> {
    let user = User::from(payload.user?);
    let mut member = Member::new(guild_id.clone(), user);
    member.nick = payload.nick;
    member.role_ids = payload.roles;
    member.joined_at = payload.joined_at;
    member.pending = payload.pending;
    Some(member)
}

/// Build a full Guild with its nested members, channels and roles
pub fn guild_from_payload(payload: GuildCreateEvent) -> Guild {
    let mut guild = Guild::unavailable(payload.id);
    guild.name = payload.name;
    guild.icon = payload.icon;
    guild.owner_id = payload.owner_id;
    guild.unavailable = payload.unavailable;
    guild.member_count = payload.member_count;

    for role in payload.roles {
        let role = Role::from(role);
        guild.roles.set(role.id.clone(), role);
    }

    for channel in payload.channels {
        let mut channel = Channel::from(channel);
        // Nested channels omit guild_id
        channel.guild_id.get_or_insert_with(|| guild.id.clone());
        guild.channels.set(channel.id.clone(), channel);
    }

    for member in payload.members {
        if let Some(member) = member_from_payload(&guild.id, member) {
            guild.members.set(member.id().clone(), member);
        }
    }

    guild
}

/// Build a Message, resolving author and mentions through `resolve_user`
///
/// `resolve_user` receives each decoded user and returns the instance to embed,
/// which lets the caller upsert it into a user cache first.
pub fn message_from_payload(
    payload: MessagePayload,
    mut resolve_user: impl FnMut(User) -> User,
) -> Message {
    let author = resolve_user(User::from(payload.author));
    let mut message = Message::new(payload.id, payload.channel_id, author, payload.content);
    message.guild_id = payload.guild_id;
    message.timestamp = payload.timestamp;
    message.edited_timestamp = payload.edited_timestamp;
    message.tts = payload.tts;
    message.attachments = payload.attachments.into_iter().map(Attachment::from).collect();
    message.embeds = payload.embeds;
    message.mentions = payload
        .mentions
        .into_iter()
        .map(|u| resolve_user(User::from(u)))
        .collect();
    message.reference = payload.message_reference.map(MessageReference::from);
    message
}
