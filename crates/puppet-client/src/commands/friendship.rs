use puppet_net::RemoteMethod;
use puppet_shared::protocol::{
    Empty, FriendshipAddRequest, FriendshipPayloadResponse, FriendshipSearchPhoneRequest,
    FriendshipSearchResponse, FriendshipSearchWeixinRequest, IdRequest, PayloadRequest,
};
use puppet_shared::types::FriendshipPayload;
use puppet_shared::Result;

use crate::commands::to_json;
use crate::service::PuppetService;

impl PuppetService {
    /// Look up a contact by weixin id, then by phone number.
    ///
    /// The phone search only runs when the weixin search found nothing.
    pub async fn friendship_search(
        &self,
        weixin: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<String>> {
        let stub = self.stub()?;

        if let Some(weixin) = weixin {
            let response: FriendshipSearchResponse = stub
                .call(
                    RemoteMethod::FriendshipSearchWeixin,
                    FriendshipSearchWeixinRequest {
                        weixin: weixin.to_string(),
                    },
                )
                .await?;
            if let Some(contact_id) = non_empty(response.contact_id) {
                return Ok(Some(contact_id));
            }
        }

        if let Some(phone) = phone {
            let response: FriendshipSearchResponse = stub
                .call(
                    RemoteMethod::FriendshipSearchPhone,
                    FriendshipSearchPhoneRequest {
                        phone: phone.to_string(),
                    },
                )
                .await?;
            return Ok(non_empty(response.contact_id));
        }

        Ok(None)
    }

    pub async fn friendship_add(&self, contact_id: &str, hello: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::FriendshipAdd,
                FriendshipAddRequest {
                    contact_id: contact_id.to_string(),
                    hello: hello.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Fetch a friendship request, storing `payload` on the service first
    /// when given.
    pub async fn friendship_payload(
        &self,
        friendship_id: &str,
        payload: Option<&FriendshipPayload>,
    ) -> Result<FriendshipPayload> {
        let response: FriendshipPayloadResponse = self
            .stub()?
            .call(
                RemoteMethod::FriendshipPayload,
                PayloadRequest {
                    id: friendship_id.to_string(),
                    payload: payload.map(to_json).transpose()?,
                },
            )
            .await?;
        response.try_into()
    }

    pub async fn friendship_accept(&self, friendship_id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::FriendshipAccept,
                IdRequest {
                    id: friendship_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::started;
    use puppet_shared::types::FriendshipType;

    #[tokio::test]
    async fn test_search_prefers_weixin() {
        let (service, transport) = started().await;
        transport.respond(
            RemoteMethod::FriendshipSearchWeixin,
            FriendshipSearchResponse {
                contact_id: Some("wxid_found".to_string()),
            },
        );

        let found = service
            .friendship_search(Some("alice"), Some("13800000000"))
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("wxid_found"));
        assert!(!transport.calls().contains(&RemoteMethod::FriendshipSearchPhone));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_search_falls_back_to_phone() {
        let (service, transport) = started().await;
        transport.respond(
            RemoteMethod::FriendshipSearchWeixin,
            FriendshipSearchResponse {
                contact_id: Some(String::new()),
            },
        );
        transport.respond(
            RemoteMethod::FriendshipSearchPhone,
            FriendshipSearchResponse {
                contact_id: Some("wxid_phone".to_string()),
            },
        );

        let found = service
            .friendship_search(Some("alice"), Some("13800000000"))
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("wxid_phone"));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_search_without_criteria_is_none() {
        let (service, transport) = started().await;
        let before = transport.calls().len();
        assert_eq!(service.friendship_search(None, None).await.unwrap(), None);
        assert_eq!(transport.calls().len(), before);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_payload_sends_stored_json() {
        let (service, transport) = started().await;
        transport.respond(
            RemoteMethod::FriendshipPayload,
            FriendshipPayloadResponse {
                id: "fr-1".to_string(),
                contact_id: "wxid_b".to_string(),
                hello: "hi".to_string(),
                r#type: FriendshipType::Receive.code(),
                ..Default::default()
            },
        );
        let stored = FriendshipPayload {
            id: "fr-1".to_string(),
            contact_id: "wxid_b".to_string(),
            hello: "hi".to_string(),
            friendship_type: FriendshipType::Receive,
            stranger: String::new(),
            ticket: "t".to_string(),
            scene: 0,
        };

        let payload = service
            .friendship_payload("fr-1", Some(&stored))
            .await
            .unwrap();
        assert_eq!(payload.friendship_type, FriendshipType::Receive);

        let request: PayloadRequest = transport.last_request(RemoteMethod::FriendshipPayload);
        let sent: serde_json::Value =
            serde_json::from_str(request.payload.as_deref().unwrap()).unwrap();
        assert_eq!(sent["contactId"], "wxid_b");
        service.stop().await;
    }
}
