use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Message types
// ---------------------------------------------------------------------------

/// Canonical message type, numbered as the local puppet contract numbers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum MessageType {
    Unspecified = 0,
    Attachment = 1,
    Audio = 2,
    Contact = 3,
    Emoticon = 4,
    Image = 5,
    Text = 6,
    Video = 7,
    ChatHistory = 8,
    Location = 9,
    MiniProgram = 10,
    Transfer = 11,
    RedEnvelope = 12,
    Recalled = 13,
    Url = 14,
}

/// Message type as the backend numbers it. The ordering differs from
/// [`MessageType`] and includes `GroupNote`, which has no canonical
/// counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ServerMessageType {
    Unknown = 0,
    Attachment = 1,
    Audio = 2,
    Contact = 3,
    ChatHistory = 4,
    Emoticon = 5,
    Image = 6,
    Text = 7,
    Location = 8,
    MiniProgram = 9,
    GroupNote = 10,
    Transfer = 11,
    RedEnvelope = 12,
    Recalled = 13,
    Url = 14,
    Video = 15,
}

impl ServerMessageType {
    /// Every server code, in wire order.
    pub const ALL: [ServerMessageType; 16] = [
        Self::Unknown,
        Self::Attachment,
        Self::Audio,
        Self::Contact,
        Self::ChatHistory,
        Self::Emoticon,
        Self::Image,
        Self::Text,
        Self::Location,
        Self::MiniProgram,
        Self::GroupNote,
        Self::Transfer,
        Self::RedEnvelope,
        Self::Recalled,
        Self::Url,
        Self::Video,
    ];

    /// The canonical type this server code stands for.
    pub fn canonical(self) -> MessageType {
        match self {
            Self::Unknown | Self::GroupNote => MessageType::Unspecified,
            Self::Attachment => MessageType::Attachment,
            Self::Audio => MessageType::Audio,
            Self::Contact => MessageType::Contact,
            Self::ChatHistory => MessageType::ChatHistory,
            Self::Emoticon => MessageType::Emoticon,
            Self::Image => MessageType::Image,
            Self::Text => MessageType::Text,
            Self::Location => MessageType::Location,
            Self::MiniProgram => MessageType::MiniProgram,
            Self::Transfer => MessageType::Transfer,
            Self::RedEnvelope => MessageType::RedEnvelope,
            Self::Recalled => MessageType::Recalled,
            Self::Url => MessageType::Url,
            Self::Video => MessageType::Video,
        }
    }
}

impl TryFrom<i32> for ServerMessageType {
    type Error = DecodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(DecodeError::InvalidCode {
                field: "message type",
                value: i64::from(code),
            })
    }
}

impl MessageType {
    /// Remap a backend message-type code to the canonical type.
    pub fn from_server_code(code: i32) -> Result<Self, DecodeError> {
        ServerMessageType::try_from(code).map(ServerMessageType::canonical)
    }
}

// ---------------------------------------------------------------------------
// Small enumerations
// ---------------------------------------------------------------------------

/// Login QR code scan progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Unknown,
    Cancel,
    Waiting,
    Scanned,
    Confirmed,
    Timeout,
}

impl ScanStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Cancel),
            2 => Some(Self::Waiting),
            3 => Some(Self::Scanned),
            4 => Some(Self::Confirmed),
            5 => Some(Self::Timeout),
            _ => None,
        }
    }
}

/// Cached payload family, used when marking a payload dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PayloadType {
    Unspecified = 0,
    Message = 1,
    Contact = 2,
    Room = 3,
    RoomMember = 4,
    Friendship = 5,
}

/// Requested image resolution for `message_image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ImageType {
    Unspecified = 0,
    Thumbnail = 1,
    Hd = 2,
    #[default]
    Artwork = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactGender {
    Unknown,
    Male,
    Female,
}

impl ContactGender {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactType {
    Unknown,
    Individual,
    Official,
    Corporation,
}

impl ContactType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Individual),
            2 => Some(Self::Official),
            3 => Some(Self::Corporation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FriendshipType {
    Unknown,
    Confirm,
    Receive,
    Verify,
}

impl FriendshipType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Confirm),
            2 => Some(Self::Receive),
            3 => Some(Self::Verify),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Confirm => 1,
            Self::Receive => 2,
            Self::Verify => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub id: String,
    pub gender: ContactGender,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub name: String,
    pub avatar: String,
    pub address: String,
    pub alias: String,
    pub city: String,
    pub friend: bool,
    pub province: String,
    pub signature: String,
    pub star: bool,
    pub weixin: String,
    pub corporation: String,
    pub title: String,
    pub description: String,
    pub coworker: bool,
    pub phones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipPayload {
    pub id: String,
    pub contact_id: String,
    pub hello: String,
    #[serde(rename = "type")]
    pub friendship_type: FriendshipType,
    pub stranger: String,
    pub ticket: String,
    pub scene: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: String,
    pub filename: String,
    pub text: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub talker_id: String,
    pub room_id: String,
    pub listener_id: String,
    pub mention_ids: Vec<String>,
}

impl MessagePayload {
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// `true` when the message was posted in a room rather than a direct chat.
    pub fn in_room(&self) -> bool {
        !self.room_id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub id: String,
    pub topic: String,
    pub avatar: String,
    pub owner_id: String,
    pub admin_ids: Vec<String>,
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMemberPayload {
    pub id: String,
    pub room_alias: String,
    pub inviter_id: String,
    pub avatar: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInvitationPayload {
    pub id: String,
    pub inviter_id: String,
    pub topic: String,
    pub member_count: i32,
    pub member_ids: Vec<String>,
    pub timestamp: u64,
    pub avatar: String,
    pub invitation: String,
    pub receiver_id: String,
}

/// Link card carried as a JSON string on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlLinkPayload {
    pub url: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
}

/// Mini-program card carried as a JSON string on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MiniProgramPayload {
    pub appid: Option<String>,
    pub description: Option<String>,
    pub page_path: Option<String>,
    pub icon_url: Option<String>,
    pub share_id: Option<String>,
    pub thumb_url: Option<String>,
    pub thumb_key: Option<String>,
    pub title: Option<String>,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_text_maps_to_canonical_text() {
        assert_eq!(MessageType::from_server_code(7).unwrap(), MessageType::Text);
        assert_eq!(MessageType::from_server_code(15).unwrap(), MessageType::Video);
        assert_eq!(MessageType::from_server_code(4).unwrap(), MessageType::ChatHistory);
    }

    #[test]
    fn test_group_note_has_no_canonical_type() {
        assert_eq!(
            MessageType::from_server_code(10).unwrap(),
            MessageType::Unspecified
        );
    }

    #[test]
    fn test_out_of_range_server_code_is_error() {
        for code in [16, 99, -1, i32::MAX] {
            let err = MessageType::from_server_code(code).unwrap_err();
            assert!(matches!(err, DecodeError::InvalidCode { .. }), "code {code}");
        }
    }

    #[test]
    fn test_mapping_covers_whole_server_domain() {
        for (index, server) in ServerMessageType::ALL.iter().enumerate() {
            assert_eq!(*server as i32, index as i32);
            let code = i32::try_from(index).unwrap();
            assert_eq!(ServerMessageType::try_from(code).unwrap(), *server);
        }
    }

    #[test]
    fn test_mini_program_json_uses_camel_case() {
        let json = r#"{"appid":"wx123","pagePath":"pages/index","title":"demo"}"#;
        let payload: MiniProgramPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.appid.as_deref(), Some("wx123"));
        assert_eq!(payload.page_path.as_deref(), Some("pages/index"));
        assert_eq!(payload.username, None);
    }

    #[test]
    fn test_message_timestamp() {
        let payload = MessagePayload {
            id: "m".to_string(),
            filename: String::new(),
            text: "hi".to_string(),
            timestamp: 1_600_000_000,
            message_type: MessageType::Text,
            talker_id: "t".to_string(),
            room_id: String::new(),
            listener_id: "l".to_string(),
            mention_ids: Vec::new(),
        };
        assert_eq!(payload.sent_at().unwrap().timestamp(), 1_600_000_000);
        assert!(!payload.in_room());
    }
}
