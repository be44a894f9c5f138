use puppet_net::RemoteMethod;
use puppet_shared::protocol::{
    ContactAliasRequest, ContactAliasResponse, ContactAvatarRequest, ContactPayloadResponse,
    ContactSelfNameRequest, ContactSelfSignatureRequest, Empty, FileBoxResponse, IdRequest,
    IdsResponse, QrCodeResponse, TagContactListRequest,
};
use puppet_shared::types::{ContactPayload, PayloadType};
use puppet_shared::{FileBox, Result};

use crate::commands::required;
use crate::service::PuppetService;

impl PuppetService {
    pub async fn contact_list(&self) -> Result<Vec<String>> {
        let response: IdsResponse = self.stub()?.call(RemoteMethod::ContactList, Empty {}).await?;
        Ok(response.ids)
    }

    pub async fn contact_payload(&self, contact_id: &str) -> Result<ContactPayload> {
        let response: ContactPayloadResponse = self
            .stub()?
            .call(
                RemoteMethod::ContactPayload,
                IdRequest {
                    id: contact_id.to_string(),
                },
            )
            .await?;
        response.try_into()
    }

    /// Get the alias of `contact_id`, or set it when `alias` is given.
    ///
    /// A set returns the alias that was stored. A get fails with a payload
    /// error when the service returns no alias.
    pub async fn contact_alias(&self, contact_id: &str, alias: Option<&str>) -> Result<String> {
        let response: ContactAliasResponse = self
            .stub()?
            .call(
                RemoteMethod::ContactAlias,
                ContactAliasRequest {
                    id: contact_id.to_string(),
                    alias: alias.map(str::to_string),
                },
            )
            .await?;

        match alias {
            Some(alias) => Ok(alias.to_string()),
            None => required(response.alias, "contact alias"),
        }
    }

    /// Get the avatar of `contact_id`, or set it when `file_box` is given.
    pub async fn contact_avatar(
        &self,
        contact_id: &str,
        file_box: Option<FileBox>,
    ) -> Result<FileBox> {
        let stub = self.stub()?;

        if let Some(file_box) = file_box {
            stub.call::<_, Empty>(
                RemoteMethod::ContactAvatar,
                ContactAvatarRequest {
                    id: contact_id.to_string(),
                    filebox: Some(file_box.to_json_string()?),
                },
            )
            .await?;
            return Ok(file_box);
        }

        let response: FileBoxResponse = stub
            .call(
                RemoteMethod::ContactAvatar,
                ContactAvatarRequest {
                    id: contact_id.to_string(),
                    filebox: None,
                },
            )
            .await?;
        FileBox::from_json_str(&required(response.filebox, "avatar file box")?)
    }

    pub async fn contact_tag_ids(&self, contact_id: &str) -> Result<Vec<String>> {
        let response: IdsResponse = self
            .stub()?
            .call(
                RemoteMethod::TagContactList,
                TagContactListRequest {
                    contact_id: Some(contact_id.to_string()),
                },
            )
            .await?;
        Ok(response.ids)
    }

    /// QR code of the logged-in account.
    pub async fn contact_self_qr_code(&self) -> Result<String> {
        let response: QrCodeResponse = self
            .stub()?
            .call(RemoteMethod::ContactSelfQrCode, Empty {})
            .await?;
        required(response.qrcode, "qr code")
    }

    pub async fn contact_self_name(&self, name: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::ContactSelfName,
                ContactSelfNameRequest {
                    name: name.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Set the signature of the logged-in account.
    pub async fn contact_signature(&self, signature: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::ContactSelfSignature,
                ContactSelfSignatureRequest {
                    signature: signature.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn contact_payload_dirty(&self, contact_id: &str) -> Result<()> {
        self.dirty_payload(PayloadType::Contact, contact_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::started;
    use puppet_shared::protocol::DirtyPayloadRequest;
    use puppet_shared::types::{ContactGender, ContactType};
    use puppet_shared::PuppetError;

    #[tokio::test]
    async fn test_contact_payload_converts_codes() {
        let (service, transport) = started().await;
        transport.respond(
            RemoteMethod::ContactPayload,
            ContactPayloadResponse {
                id: "wxid_a".to_string(),
                name: "Alice".to_string(),
                gender: 2,
                r#type: 1,
                phones: vec!["+86 100".to_string()],
                ..Default::default()
            },
        );

        let payload = service.contact_payload("wxid_a").await.unwrap();
        assert_eq!(payload.name, "Alice");
        assert_eq!(payload.gender, ContactGender::Female);
        assert_eq!(payload.contact_type, ContactType::Individual);
        assert_eq!(payload.phones, vec!["+86 100".to_string()]);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_alias_get_without_value_is_payload_error() {
        let (service, _transport) = started().await;
        let err = service.contact_alias("wxid_a", None).await.unwrap_err();
        assert!(matches!(err, PuppetError::Payload(_)));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_alias_get_and_set() {
        let (service, transport) = started().await;
        transport.respond(
            RemoteMethod::ContactAlias,
            ContactAliasResponse {
                alias: Some("Al".to_string()),
            },
        );
        assert_eq!(service.contact_alias("wxid_a", None).await.unwrap(), "Al");

        let stored = service.contact_alias("wxid_a", Some("Ally")).await.unwrap();
        assert_eq!(stored, "Ally");
        let request: ContactAliasRequest = transport.last_request(RemoteMethod::ContactAlias);
        assert_eq!(request.alias.as_deref(), Some("Ally"));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_avatar_get_parses_file_box() {
        let (service, transport) = started().await;
        let avatar = FileBox::from_url("https://cdn.example.com/a.jpg", "a.jpg");
        transport.respond(
            RemoteMethod::ContactAvatar,
            FileBoxResponse {
                filebox: Some(avatar.to_json_string().unwrap()),
            },
        );

        assert_eq!(service.contact_avatar("wxid_a", None).await.unwrap(), avatar);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_avatar_set_sends_file_box_json() {
        let (service, transport) = started().await;
        let avatar = FileBox::from_bytes(b"jpeg", "me.jpg");

        let returned = service
            .contact_avatar("wxid_self", Some(avatar.clone()))
            .await
            .unwrap();
        assert_eq!(returned, avatar);

        let request: ContactAvatarRequest = transport.last_request(RemoteMethod::ContactAvatar);
        let sent = FileBox::from_json_str(request.filebox.as_deref().unwrap()).unwrap();
        assert_eq!(sent.to_bytes().unwrap(), b"jpeg");
        service.stop().await;
    }

    #[tokio::test]
    async fn test_signature_uses_self_signature_method() {
        let (service, transport) = started().await;
        service.contact_signature("hello world").await.unwrap();

        let request: ContactSelfSignatureRequest =
            transport.last_request(RemoteMethod::ContactSelfSignature);
        assert_eq!(request.signature, "hello world");
        service.stop().await;
    }

    #[tokio::test]
    async fn test_payload_dirty_marks_contact() {
        let (service, transport) = started().await;
        service.contact_payload_dirty("wxid_a").await.unwrap();

        let request: DirtyPayloadRequest = transport.last_request(RemoteMethod::DirtyPayload);
        assert_eq!(request.r#type, PayloadType::Contact as i32);
        assert_eq!(request.id, "wxid_a");
        service.stop().await;
    }
}
