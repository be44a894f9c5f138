use puppet_net::RemoteMethod;
use puppet_shared::protocol::{Empty, IdContactRequest, IdRequest, IdsResponse, TagContactListRequest};
use puppet_shared::Result;
use tracing::debug;

use crate::service::PuppetService;

impl PuppetService {
    pub async fn tag_contact_add(&self, tag_id: &str, contact_id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::TagContactAdd,
                IdContactRequest {
                    id: tag_id.to_string(),
                    contact_id: contact_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn tag_contact_remove(&self, tag_id: &str, contact_id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::TagContactRemove,
                IdContactRequest {
                    id: tag_id.to_string(),
                    contact_id: contact_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn tag_contact_delete(&self, tag_id: &str) -> Result<()> {
        self.stub()?
            .call::<_, Empty>(
                RemoteMethod::TagContactDelete,
                IdRequest {
                    id: tag_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Tag ids of `contact_id`, or every tag id when `None`.
    pub async fn tag_contact_list(&self, contact_id: Option<&str>) -> Result<Vec<String>> {
        let response: IdsResponse = self
            .stub()?
            .call(
                RemoteMethod::TagContactList,
                TagContactListRequest {
                    contact_id: contact_id.map(str::to_string),
                },
            )
            .await?;
        Ok(response.ids)
    }

    /// The service has no favorite tags; accepted and ignored.
    pub async fn tag_favorite_add(&self, tag_id: &str, contact_id: &str) -> Result<()> {
        debug!(tag_id, contact_id, "tag_favorite_add is not supported, ignoring");
        Ok(())
    }

    /// The service has no favorite tags; accepted and ignored.
    pub async fn tag_favorite_delete(&self, tag_id: &str) -> Result<()> {
        debug!(tag_id, "tag_favorite_delete is not supported, ignoring");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::started;

    #[tokio::test]
    async fn test_tag_contact_list_filters_by_contact() {
        let (service, transport) = started().await;
        transport.respond(
            RemoteMethod::TagContactList,
            IdsResponse {
                ids: vec!["tag-1".to_string()],
            },
        );

        let ids = service.tag_contact_list(Some("wxid_a")).await.unwrap();
        assert_eq!(ids, vec!["tag-1".to_string()]);
        let request: TagContactListRequest = transport.last_request(RemoteMethod::TagContactList);
        assert_eq!(request.contact_id.as_deref(), Some("wxid_a"));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_favorite_tags_make_no_remote_call() {
        let (service, transport) = started().await;
        let before = transport.calls().len();

        service.tag_favorite_add("tag-1", "wxid_a").await.unwrap();
        service.tag_favorite_delete("tag-1").await.unwrap();
        assert_eq!(transport.calls().len(), before);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_tag_add_sends_tag_and_contact() {
        let (service, transport) = started().await;
        service.tag_contact_add("tag-1", "wxid_a").await.unwrap();

        let request: IdContactRequest = transport.last_request(RemoteMethod::TagContactAdd);
        assert_eq!(request.id, "tag-1");
        assert_eq!(request.contact_id, "wxid_a");
        service.stop().await;
    }
}
