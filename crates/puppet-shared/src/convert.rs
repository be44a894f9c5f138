//! Conversions from protobuf responses to domain payloads.

use crate::error::PuppetError;
use crate::protocol::{
    ContactPayloadResponse, FriendshipPayloadResponse, MessagePayloadResponse,
    RoomInvitationPayloadResponse, RoomMemberPayloadResponse, RoomPayloadResponse,
};
use crate::types::{
    ContactGender, ContactPayload, ContactType, FriendshipPayload, FriendshipType,
    MessagePayload, MessageType, RoomInvitationPayload, RoomMemberPayload, RoomPayload,
};

fn invalid_code(field: &str, code: i32) -> PuppetError {
    PuppetError::payload(format!("invalid {field} code: {code}"))
}

impl TryFrom<ContactPayloadResponse> for ContactPayload {
    type Error = PuppetError;

    fn try_from(r: ContactPayloadResponse) -> Result<Self, Self::Error> {
        let gender = ContactGender::from_code(r.gender)
            .ok_or_else(|| invalid_code("contact gender", r.gender))?;
        let contact_type =
            ContactType::from_code(r.r#type).ok_or_else(|| invalid_code("contact type", r.r#type))?;

        Ok(Self {
            id: r.id,
            gender,
            contact_type,
            name: r.name,
            avatar: r.avatar,
            address: r.address,
            alias: r.alias,
            city: r.city,
            friend: r.friend,
            province: r.province,
            signature: r.signature,
            star: r.star,
            weixin: r.weixin,
            corporation: r.corporation,
            title: r.title,
            description: r.description,
            coworker: r.coworker,
            phones: r.phones,
        })
    }
}

impl TryFrom<FriendshipPayloadResponse> for FriendshipPayload {
    type Error = PuppetError;

    fn try_from(r: FriendshipPayloadResponse) -> Result<Self, Self::Error> {
        let friendship_type = FriendshipType::from_code(r.r#type)
            .ok_or_else(|| invalid_code("friendship type", r.r#type))?;

        Ok(Self {
            id: r.id,
            contact_id: r.contact_id,
            hello: r.hello,
            friendship_type,
            stranger: r.stranger,
            ticket: r.ticket,
            scene: r.scene,
        })
    }
}

impl TryFrom<MessagePayloadResponse> for MessagePayload {
    type Error = PuppetError;

    /// The backend numbers message types differently; the type is remapped
    /// to the canonical numbering here.
    fn try_from(r: MessagePayloadResponse) -> Result<Self, Self::Error> {
        let message_type = MessageType::from_server_code(r.r#type)?;

        Ok(Self {
            id: r.id,
            filename: r.filename,
            text: r.text,
            timestamp: r.timestamp,
            message_type,
            talker_id: r.talker_id,
            room_id: r.room_id,
            listener_id: r.listener_id,
            mention_ids: r.mention_ids,
        })
    }
}

impl From<RoomPayloadResponse> for RoomPayload {
    fn from(r: RoomPayloadResponse) -> Self {
        Self {
            id: r.id,
            topic: r.topic,
            avatar: r.avatar,
            owner_id: r.owner_id,
            admin_ids: r.admin_ids,
            member_ids: r.member_ids,
        }
    }
}

impl From<RoomMemberPayloadResponse> for RoomMemberPayload {
    fn from(r: RoomMemberPayloadResponse) -> Self {
        Self {
            id: r.id,
            room_alias: r.room_alias,
            inviter_id: r.inviter_id,
            avatar: r.avatar,
            name: r.name,
        }
    }
}

impl From<RoomInvitationPayloadResponse> for RoomInvitationPayload {
    fn from(r: RoomInvitationPayloadResponse) -> Self {
        Self {
            id: r.id,
            inviter_id: r.inviter_id,
            topic: r.topic,
            member_count: r.member_count,
            member_ids: r.member_ids,
            timestamp: r.timestamp,
            avatar: r.avatar,
            invitation: r.invitation,
            receiver_id: r.receiver_id,
        }
    }
}
