//! Typed puppet events and the decoder that builds them from wire envelopes.
//!
//! Every envelope tag maps to exactly one [`PuppetEvent`] variant. Decoding
//! never substitutes a default event: an unknown tag, a payload that is not
//! JSON, or a payload missing a required field is a [`DecodeError`].

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::protocol::EventType;
use crate::types::ScanStatus;

/// Registration key of the event dispatcher. One per public event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Scan,
    Dong,
    Message,
    Heartbeat,
    Error,
    Friendship,
    RoomJoin,
    RoomInvite,
    RoomLeave,
    RoomTopic,
    Ready,
    Login,
    Logout,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        Self::Scan,
        Self::Dong,
        Self::Message,
        Self::Heartbeat,
        Self::Error,
        Self::Friendship,
        Self::RoomJoin,
        Self::RoomInvite,
        Self::RoomLeave,
        Self::RoomTopic,
        Self::Ready,
        Self::Login,
        Self::Logout,
    ];

    /// Public event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Dong => "dong",
            Self::Message => "message",
            Self::Heartbeat => "heartbeat",
            Self::Error => "error",
            Self::Friendship => "friendship",
            Self::RoomJoin => "room-join",
            Self::RoomInvite => "room-invite",
            Self::RoomLeave => "room-leave",
            Self::RoomTopic => "room-topic",
            Self::Ready => "ready",
            Self::Login => "login",
            Self::Logout => "logout",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| format!("unknown event name: {name}"))
    }
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEvent {
    pub status: ScanStatus,
    pub qrcode: Option<String>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEvent {
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginEvent {
    pub contact_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutEvent {
    pub contact_id: String,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipEvent {
    pub friendship_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInviteEvent {
    pub room_invitation_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinEvent {
    #[serde(rename = "inviteeIdList", default)]
    pub invitee_ids: Vec<String>,
    pub inviter_id: String,
    pub room_id: String,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLeaveEvent {
    #[serde(rename = "removeeIdList", default)]
    pub removee_ids: Vec<String>,
    pub remover_id: String,
    pub room_id: String,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTopicEvent {
    pub changer_id: String,
    pub new_topic: String,
    #[serde(default)]
    pub old_topic: String,
    pub room_id: String,
    #[serde(default)]
    pub timestamp: i64,
}

/// A decoded event, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum PuppetEvent {
    Scan(ScanEvent),
    Dong(DataEvent),
    Message(MessageEvent),
    Heartbeat(DataEvent),
    Error(DataEvent),
    Friendship(FriendshipEvent),
    RoomJoin(RoomJoinEvent),
    RoomInvite(RoomInviteEvent),
    RoomLeave(RoomLeaveEvent),
    RoomTopic(RoomTopicEvent),
    Ready(DataEvent),
    Login(LoginEvent),
    Logout(LogoutEvent),
}

impl PuppetEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scan(_) => EventKind::Scan,
            Self::Dong(_) => EventKind::Dong,
            Self::Message(_) => EventKind::Message,
            Self::Heartbeat(_) => EventKind::Heartbeat,
            Self::Error(_) => EventKind::Error,
            Self::Friendship(_) => EventKind::Friendship,
            Self::RoomJoin(_) => EventKind::RoomJoin,
            Self::RoomInvite(_) => EventKind::RoomInvite,
            Self::RoomLeave(_) => EventKind::RoomLeave,
            Self::RoomTopic(_) => EventKind::RoomTopic,
            Self::Ready(_) => EventKind::Ready,
            Self::Login(_) => EventKind::Login,
            Self::Logout(_) => EventKind::Logout,
        }
    }

    /// Build the error event reported for a local failure.
    pub fn error(data: impl Into<String>) -> Self {
        Self::Error(DataEvent { data: data.into() })
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ScanWire {
    status: i64,
    #[serde(default)]
    qrcode: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Decode one envelope (`type` tag plus JSON `payload`) into a typed event.
///
/// The tag is checked before the payload is parsed, so an unknown tag is
/// reported as such whatever the payload holds.
pub fn decode_envelope(tag: i32, payload: &str) -> Result<PuppetEvent, DecodeError> {
    let event_type = EventType::try_from(tag).map_err(|_| DecodeError::UnknownTag(tag))?;
    if event_type == EventType::Unspecified {
        return Err(DecodeError::Unspecified);
    }

    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|source| DecodeError::Json {
            kind: "envelope",
            source,
        })?;

    let event = match event_type {
        EventType::Unspecified => return Err(DecodeError::Unspecified),
        EventType::Scan => {
            let wire: ScanWire = from_value("scan", value)?;
            let status = ScanStatus::from_code(wire.status).ok_or(DecodeError::InvalidCode {
                field: "scan status",
                value: wire.status,
            })?;
            PuppetEvent::Scan(ScanEvent {
                status,
                qrcode: wire.qrcode,
                data: wire.data,
            })
        }
        EventType::Dong => PuppetEvent::Dong(from_value("dong", value)?),
        EventType::Message => PuppetEvent::Message(from_value("message", value)?),
        EventType::Heartbeat => PuppetEvent::Heartbeat(from_value("heartbeat", value)?),
        EventType::Error => PuppetEvent::Error(from_value("error", value)?),
        EventType::Friendship => PuppetEvent::Friendship(from_value("friendship", value)?),
        EventType::RoomJoin => PuppetEvent::RoomJoin(from_value("room-join", value)?),
        EventType::RoomInvite => PuppetEvent::RoomInvite(from_value("room-invite", value)?),
        EventType::RoomLeave => PuppetEvent::RoomLeave(from_value("room-leave", value)?),
        EventType::RoomTopic => PuppetEvent::RoomTopic(from_value("room-topic", value)?),
        EventType::Ready => PuppetEvent::Ready(from_value("ready", value)?),
        EventType::Login => PuppetEvent::Login(from_value("login", value)?),
        EventType::Logout => PuppetEvent::Logout(from_value("logout", value)?),
    };

    Ok(event)
}

fn from_value<T: DeserializeOwned>(
    kind: &'static str,
    value: serde_json::Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::Json { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_login() {
        let event = decode_envelope(EventType::Login as i32, r#"{"contactId":"wxid_1"}"#).unwrap();
        assert_eq!(
            event,
            PuppetEvent::Login(LoginEvent {
                contact_id: "wxid_1".to_string()
            })
        );
        assert_eq!(event.kind(), EventKind::Login);
    }

    #[test]
    fn test_decode_scan_defaults_optional_fields() {
        let event = decode_envelope(EventType::Scan as i32, r#"{"status":2}"#).unwrap();
        let PuppetEvent::Scan(scan) = event else {
            panic!("expected scan event");
        };
        assert_eq!(scan.status, ScanStatus::Waiting);
        assert_eq!(scan.qrcode, None);
        assert_eq!(scan.data, None);
    }

    #[test]
    fn test_decode_scan_rejects_unknown_status() {
        let err = decode_envelope(EventType::Scan as i32, r#"{"status":42}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidCode { value: 42, .. }));
    }

    #[test]
    fn test_decode_room_join_maps_wire_names() {
        let payload = r#"{
            "inviteeIdList": ["a", "b"],
            "inviterId": "owner",
            "roomId": "room@chatroom",
            "timestamp": 1600000000
        }"#;
        let event = decode_envelope(EventType::RoomJoin as i32, payload).unwrap();
        let PuppetEvent::RoomJoin(join) = event else {
            panic!("expected room-join event");
        };
        assert_eq!(join.invitee_ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(join.inviter_id, "owner");
        assert_eq!(join.room_id, "room@chatroom");
        assert_eq!(join.timestamp, 1_600_000_000);
    }

    #[test]
    fn test_decode_room_leave_defaults_list() {
        let payload = r#"{"removerId":"owner","roomId":"r"}"#;
        let PuppetEvent::RoomLeave(leave) =
            decode_envelope(EventType::RoomLeave as i32, payload).unwrap()
        else {
            panic!("expected room-leave event");
        };
        assert!(leave.removee_ids.is_empty());
        assert_eq!(leave.timestamp, 0);
    }

    #[test]
    fn test_heartbeat_ignores_extra_keys() {
        let event =
            decode_envelope(EventType::Heartbeat as i32, r#"{"data":"beat","timeout":60}"#)
                .unwrap();
        assert_eq!(
            event,
            PuppetEvent::Heartbeat(DataEvent {
                data: "beat".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = decode_envelope(EventType::Login as i32, "{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json { kind: "envelope", .. }));
    }

    #[test]
    fn test_missing_required_field_is_error() {
        let err = decode_envelope(EventType::Message as i32, r#"{}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json { kind: "message", .. }));
    }

    #[test]
    fn test_unspecified_and_unknown_tags_are_errors() {
        assert!(matches!(
            decode_envelope(0, "{}").unwrap_err(),
            DecodeError::Unspecified
        ));
        let err = decode_envelope(99, "{}").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownTag(99)));
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_unknown_tag_wins_over_bad_payload() {
        let err = decode_envelope(99, "not json").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownTag(99)));
        assert!(matches!(
            decode_envelope(0, "").unwrap_err(),
            DecodeError::Unspecified
        ));
    }

    #[test]
    fn test_event_kind_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        assert!("room_join".parse::<EventKind>().is_err());
    }
}
