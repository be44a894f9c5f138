use puppet_net::RemoteMethod;
use puppet_shared::protocol::{
    Empty, FileBoxResponse, IdContactRequest, IdRequest, IdResponse, IdsResponse, PayloadRequest,
    QrCodeResponse, RoomAnnounceRequest, RoomAnnounceResponse, RoomCreateRequest,
    RoomInvitationPayloadResponse, RoomMemberListResponse, RoomMemberPayloadRequest,
    RoomMemberPayloadResponse, RoomPayloadResponse, RoomTopicRequest, RoomTopicResponse,
};
use puppet_shared::types::{PayloadType, RoomInvitationPayload, RoomMemberPayload, RoomPayload};
use puppet_shared::{FileBox, PuppetError, Result};
use serde::Deserialize;
use tracing::debug;

use crate::commands::{from_json, required, to_json};
use crate::service::PuppetService;

/// The part of an avatar file box this client relies on.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvatarFileBox {
    remote_url: Option<String>,
}

impl PuppetService {
    pub async fn room_list(&self) -> Result<Vec<String>> {
        let response: IdsResponse = self.stub()?.call(RemoteMethod::RoomList, Empty {}).await?;
        Ok(response.ids)
    }

    /// The service has no room search; every room id is returned for the
    /// caller to filter.
    pub async fn room_search(&self) -> Result<Vec<String>> {
        self.room_list().await
    }

    /// Create a room and return its id.
    pub async fn room_create(&self, contact_ids: &[String], topic: Option<&str>) -> Result<String> {
        let response: IdResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomCreate,
                RoomCreateRequest {
                    contact_ids: contact_ids.to_vec(),
                    topic: topic.map(str::to_string),
                },
            )
            .await?;
        Ok(response.id)
    }

    pub async fn room_payload(&self, room_id: &str) -> Result<RoomPayload> {
        let response: RoomPayloadResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomPayload,
                IdRequest {
                    id: room_id.to_string(),
                },
            )
            .await?;
        Ok(response.into())
    }

    /// Member contact ids of `room_id`.
    pub async fn room_members(&self, room_id: &str) -> Result<Vec<String>> {
        let response: RoomMemberListResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomMemberList,
                IdRequest {
                    id: room_id.to_string(),
                },
            )
            .await?;
        Ok(response.member_ids)
    }

    pub async fn room_member_payload(
        &self,
        room_id: &str,
        member_id: &str,
    ) -> Result<RoomMemberPayload> {
        let response: RoomMemberPayloadResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomMemberPayload,
                RoomMemberPayloadRequest {
                    id: room_id.to_string(),
                    member_id: member_id.to_string(),
                },
            )
            .await?;
        Ok(response.into())
    }

    pub async fn room_add(&self, room_id: &str, contact_id: &str) -> Result<()> {
        self.room_membership(RemoteMethod::RoomAdd, room_id, contact_id)
            .await
    }

    pub async fn room_delete(&self, room_id: &str, contact_id: &str) -> Result<()> {
        self.room_membership(RemoteMethod::RoomDel, room_id, contact_id)
            .await
    }

    async fn room_membership(
        &self,
        method: RemoteMethod,
        room_id: &str,
        contact_id: &str,
    ) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                method,
                IdContactRequest {
                    id: room_id.to_string(),
                    contact_id: contact_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn room_quit(&self, room_id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::RoomQuit,
                IdRequest {
                    id: room_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Get the topic of `room_id`, or set it when `topic` is given.
    pub async fn room_topic(&self, room_id: &str, topic: Option<&str>) -> Result<String> {
        let response: RoomTopicResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomTopic,
                RoomTopicRequest {
                    id: room_id.to_string(),
                    topic: topic.map(str::to_string),
                },
            )
            .await?;

        match topic {
            Some(topic) => Ok(topic.to_string()),
            None => required(response.topic, "room topic"),
        }
    }

    /// Get the announcement of `room_id`, or set it when `text` is given.
    pub async fn room_announce(&self, room_id: &str, text: Option<&str>) -> Result<String> {
        let response: RoomAnnounceResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomAnnounce,
                RoomAnnounceRequest {
                    id: room_id.to_string(),
                    text: text.map(str::to_string),
                },
            )
            .await?;

        match text {
            Some(text) => Ok(text.to_string()),
            None => required(response.text, "room announcement"),
        }
    }

    pub async fn room_qr_code(&self, room_id: &str) -> Result<String> {
        let response: QrCodeResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomQrCode,
                IdRequest {
                    id: room_id.to_string(),
                },
            )
            .await?;
        required(response.qrcode, "room qr code")
    }

    /// Avatar of `room_id` as a url file box.
    pub async fn room_avatar(&self, room_id: &str) -> Result<FileBox> {
        let response: FileBoxResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomAvatar,
                IdRequest {
                    id: room_id.to_string(),
                },
            )
            .await?;

        let raw = required(response.filebox, "room avatar")?;
        let avatar: AvatarFileBox = from_json("room avatar", &raw)?;
        let url = avatar
            .remote_url
            .ok_or_else(|| PuppetError::payload("invalid room avatar response"))?;
        Ok(FileBox::from_url(url, format!("avatar-{room_id}.jpeg")))
    }

    /// `true` when the service can still load the room's payload.
    ///
    /// Only a remote error status counts as an invalid room; connection and
    /// lifecycle failures propagate.
    pub async fn room_validate(&self, room_id: &str) -> Result<bool> {
        match self.room_payload(room_id).await {
            Ok(_) => Ok(true),
            Err(PuppetError::Remote { code, message }) => {
                debug!(room_id, code = %code, message = %message, "Room failed validation");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn room_payload_dirty(&self, room_id: &str) -> Result<()> {
        self.dirty_payload(PayloadType::Room, room_id).await
    }

    pub async fn room_member_payload_dirty(&self, room_id: &str) -> Result<()> {
        self.dirty_payload(PayloadType::RoomMember, room_id).await
    }

    /// Fetch a room invitation, storing `payload` on the service first when
    /// given.
    pub async fn room_invitation_payload(
        &self,
        room_invitation_id: &str,
        payload: Option<&RoomInvitationPayload>,
    ) -> Result<RoomInvitationPayload> {
        let response: RoomInvitationPayloadResponse = self
            .stub()?
            .call(
                RemoteMethod::RoomInvitationPayload,
                PayloadRequest {
                    id: room_invitation_id.to_string(),
                    payload: payload.map(to_json).transpose()?,
                },
            )
            .await?;
        Ok(response.into())
    }

    pub async fn room_invitation_accept(&self, room_invitation_id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::RoomInvitationAccept,
                IdRequest {
                    id: room_invitation_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}
