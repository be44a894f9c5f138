//! Protobuf messages of the `wechaty.Puppet` service.
//!
//! The schema is owned by the backend; these declarations mirror it field
//! for field. Requests and responses that share a wire shape share one Rust
//! type (protobuf messages carry no type name on the wire).

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Tag of an inbound event envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EventType {
    Unspecified = 0,
    Heartbeat = 1,
    Message = 2,
    Dong = 3,
    Error = 16,
    Friendship = 17,
    RoomInvite = 18,
    RoomJoin = 19,
    RoomLeave = 20,
    RoomTopic = 21,
    Scan = 22,
    Ready = 23,
    Login = 25,
    Logout = 26,
}

// ---------------------------------------------------------------------------
// Shared shapes
// ---------------------------------------------------------------------------

/// Request or response without fields (`Start`, `Stop`, `Logout`, `Event`, ...).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Empty {}

/// `{ string id = 1; }`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

/// `{ optional string id = 1; }` returned by the message-send family.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OptionalIdResponse {
    #[prost(string, optional, tag = "1")]
    pub id: Option<String>,
}

/// `{ string id = 1; }` returned by `RoomCreate` and `MessageContact`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdResponse {
    #[prost(string, tag = "1")]
    pub id: String,
}

/// `{ repeated string ids = 1; }`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdsResponse {
    #[prost(string, repeated, tag = "1")]
    pub ids: Vec<String>,
}

/// `{ string id = 1; string contact_id = 2; }` used by room membership and tag calls.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdContactRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub contact_id: String,
}

/// `{ optional string qrcode = 1; }`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QrCodeResponse {
    #[prost(string, optional, tag = "1")]
    pub qrcode: Option<String>,
}

/// `{ optional string filebox = 1; }`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileBoxResponse {
    #[prost(string, optional, tag = "1")]
    pub filebox: Option<String>,
}

/// One piece of a streamed file. `name` is usually only set on the first chunk.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileBoxChunk {
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
}

/// Item of `MessageFileStream` and `MessageImageStream`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileStreamResponse {
    #[prost(message, optional, tag = "1")]
    pub file_box_chunk: Option<FileBoxChunk>,
}

// ---------------------------------------------------------------------------
// Base
// ---------------------------------------------------------------------------

/// Inbound event envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventResponse {
    #[prost(enumeration = "EventType", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub payload: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DingRequest {
    #[prost(string, tag = "1")]
    pub data: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DirtyPayloadRequest {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub id: String,
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContactPayloadResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(int32, tag = "2")]
    pub gender: i32,
    #[prost(int32, tag = "3")]
    pub r#type: i32,
    #[prost(string, tag = "4")]
    pub name: String,
    #[prost(string, tag = "5")]
    pub avatar: String,
    #[prost(string, tag = "6")]
    pub address: String,
    #[prost(string, tag = "7")]
    pub alias: String,
    #[prost(string, tag = "8")]
    pub city: String,
    #[prost(bool, tag = "9")]
    pub friend: bool,
    #[prost(string, tag = "10")]
    pub province: String,
    #[prost(string, tag = "11")]
    pub signature: String,
    #[prost(bool, tag = "12")]
    pub star: bool,
    #[prost(string, tag = "13")]
    pub weixin: String,
    #[prost(string, tag = "14")]
    pub corporation: String,
    #[prost(string, tag = "15")]
    pub title: String,
    #[prost(string, tag = "16")]
    pub description: String,
    #[prost(bool, tag = "17")]
    pub coworker: bool,
    #[prost(string, repeated, tag = "18")]
    pub phones: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContactAliasRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub alias: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContactAliasResponse {
    #[prost(string, optional, tag = "1")]
    pub alias: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContactAvatarRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub filebox: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContactSelfNameRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContactSelfSignatureRequest {
    #[prost(string, tag = "1")]
    pub signature: String,
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TagContactListRequest {
    #[prost(string, optional, tag = "1")]
    pub contact_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Friendship
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendshipSearchPhoneRequest {
    #[prost(string, tag = "1")]
    pub phone: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendshipSearchWeixinRequest {
    #[prost(string, tag = "1")]
    pub weixin: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendshipSearchResponse {
    #[prost(string, optional, tag = "1")]
    pub contact_id: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendshipAddRequest {
    #[prost(string, tag = "1")]
    pub contact_id: String,
    #[prost(string, tag = "2")]
    pub hello: String,
}

/// Shared by `FriendshipPayload` and `RoomInvitationPayload`: an id plus an
/// optional JSON payload to store.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PayloadRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub payload: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FriendshipPayloadResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub contact_id: String,
    #[prost(string, tag = "3")]
    pub hello: String,
    #[prost(int32, tag = "4")]
    pub r#type: i32,
    #[prost(string, tag = "5")]
    pub stranger: String,
    #[prost(string, tag = "6")]
    pub ticket: String,
    #[prost(int32, tag = "7")]
    pub scene: i32,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessagePayloadResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub filename: String,
    #[prost(string, tag = "3")]
    pub text: String,
    #[prost(uint64, tag = "4")]
    pub timestamp: u64,
    /// Message type in the backend's own numbering, see `ServerMessageType`.
    #[prost(int32, tag = "5")]
    pub r#type: i32,
    #[prost(string, tag = "6")]
    pub talker_id: String,
    #[prost(string, tag = "7")]
    pub room_id: String,
    #[prost(string, tag = "8")]
    pub listener_id: String,
    #[prost(string, repeated, tag = "9")]
    pub mention_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageImageStreamRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(int32, tag = "2")]
    pub r#type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageUrlResponse {
    #[prost(string, tag = "1")]
    pub url_link: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageMiniProgramResponse {
    #[prost(string, tag = "1")]
    pub mini_program: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageRecallResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageSendTextRequest {
    #[prost(string, tag = "1")]
    pub conversation_id: String,
    #[prost(string, tag = "2")]
    pub text: String,
    #[prost(string, repeated, tag = "3")]
    pub mention_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageSendContactRequest {
    #[prost(string, tag = "1")]
    pub conversation_id: String,
    #[prost(string, tag = "2")]
    pub contact_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageSendFileRequest {
    #[prost(string, tag = "1")]
    pub conversation_id: String,
    #[prost(string, tag = "2")]
    pub filebox: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageSendUrlRequest {
    #[prost(string, tag = "1")]
    pub conversation_id: String,
    #[prost(string, tag = "2")]
    pub url_link: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageSendMiniProgramRequest {
    #[prost(string, tag = "1")]
    pub conversation_id: String,
    #[prost(string, tag = "2")]
    pub mini_program: String,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomCreateRequest {
    #[prost(string, repeated, tag = "1")]
    pub contact_ids: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub topic: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomPayloadResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub topic: String,
    #[prost(string, tag = "3")]
    pub avatar: String,
    #[prost(string, tag = "4")]
    pub owner_id: String,
    #[prost(string, repeated, tag = "5")]
    pub admin_ids: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub member_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomMemberListResponse {
    #[prost(string, repeated, tag = "1")]
    pub member_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomMemberPayloadRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub member_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomMemberPayloadResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub room_alias: String,
    #[prost(string, tag = "3")]
    pub inviter_id: String,
    #[prost(string, tag = "4")]
    pub avatar: String,
    #[prost(string, tag = "5")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomTopicRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub topic: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomTopicResponse {
    #[prost(string, optional, tag = "1")]
    pub topic: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomAnnounceRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub text: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomAnnounceResponse {
    #[prost(string, optional, tag = "1")]
    pub text: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RoomInvitationPayloadResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub inviter_id: String,
    #[prost(string, tag = "3")]
    pub topic: String,
    #[prost(int32, tag = "4")]
    pub member_count: i32,
    #[prost(string, repeated, tag = "5")]
    pub member_ids: Vec<String>,
    #[prost(uint64, tag = "6")]
    pub timestamp: u64,
    #[prost(string, tag = "7")]
    pub avatar: String,
    #[prost(string, tag = "8")]
    pub invitation: String,
    #[prost(string, tag = "9")]
    pub receiver_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_event_type_codes() {
        assert_eq!(EventType::try_from(25).ok(), Some(EventType::Login));
        assert_eq!(EventType::try_from(22).ok(), Some(EventType::Scan));
        assert!(EventType::try_from(24).is_err());
    }

    #[test]
    fn test_empty_frame_decodes_to_defaults() {
        let alias = ContactAliasResponse::decode(&[][..]).unwrap();
        assert_eq!(alias.alias, None);

        let ids = IdsResponse::decode(&[][..]).unwrap();
        assert!(ids.ids.is_empty());
    }

    #[test]
    fn test_shared_shape_is_wire_compatible() {
        let request = IdContactRequest {
            id: "room-1".to_string(),
            contact_id: "contact-1".to_string(),
        };
        let bytes = request.encode_to_vec();
        let id_only = IdRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(id_only.id, "room-1");
    }
}
