use futures::stream::BoxStream;
use futures::StreamExt;
use puppet_net::RemoteMethod;
use puppet_shared::protocol::{
    FileStreamResponse, IdRequest, IdResponse, MessageImageStreamRequest,
    MessageMiniProgramResponse, MessagePayloadResponse, MessageRecallResponse,
    MessageSendContactRequest, MessageSendFileRequest, MessageSendMiniProgramRequest,
    MessageSendTextRequest, MessageSendUrlRequest, MessageUrlResponse, OptionalIdResponse,
};
use puppet_shared::types::{
    ImageType, MessagePayload, MessageType, MiniProgramPayload, UrlLinkPayload,
};
use puppet_shared::{FileBox, PuppetError, Result, TransportError};
use tracing::debug;

use crate::commands::{from_json, to_json};
use crate::service::PuppetService;

impl PuppetService {
    // -----------------------------------------------------------------------
    // Sending
    // -----------------------------------------------------------------------

    /// Send a text message, mentioning `mention_ids` in rooms.
    ///
    /// Returns the id of the sent message when the service reports one.
    pub async fn message_send_text(
        &self,
        conversation_id: &str,
        text: &str,
        mention_ids: &[String],
    ) -> Result<Option<String>> {
        let response: OptionalIdResponse = self
            .stub()?
            .call(
                RemoteMethod::MessageSendText,
                MessageSendTextRequest {
                    conversation_id: conversation_id.to_string(),
                    text: text.to_string(),
                    mention_ids: mention_ids.to_vec(),
                },
            )
            .await?;
        Ok(response.id)
    }

    /// Share the card of `contact_id`.
    pub async fn message_send_contact(
        &self,
        conversation_id: &str,
        contact_id: &str,
    ) -> Result<Option<String>> {
        let response: OptionalIdResponse = self
            .stub()?
            .call(
                RemoteMethod::MessageSendContact,
                MessageSendContactRequest {
                    conversation_id: conversation_id.to_string(),
                    contact_id: contact_id.to_string(),
                },
            )
            .await?;
        Ok(response.id)
    }

    pub async fn message_send_file(
        &self,
        conversation_id: &str,
        file_box: &FileBox,
    ) -> Result<Option<String>> {
        let response: OptionalIdResponse = self
            .stub()?
            .call(
                RemoteMethod::MessageSendFile,
                MessageSendFileRequest {
                    conversation_id: conversation_id.to_string(),
                    filebox: file_box.to_json_string()?,
                },
            )
            .await?;
        Ok(response.id)
    }

    pub async fn message_send_url(
        &self,
        conversation_id: &str,
        url_link: &UrlLinkPayload,
    ) -> Result<Option<String>> {
        let response: OptionalIdResponse = self
            .stub()?
            .call(
                RemoteMethod::MessageSendUrl,
                MessageSendUrlRequest {
                    conversation_id: conversation_id.to_string(),
                    url_link: to_json(url_link)?,
                },
            )
            .await?;
        Ok(response.id)
    }

    pub async fn message_send_mini_program(
        &self,
        conversation_id: &str,
        mini_program: &MiniProgramPayload,
    ) -> Result<Option<String>> {
        let response: OptionalIdResponse = self
            .stub()?
            .call(
                RemoteMethod::MessageSendMiniProgram,
                MessageSendMiniProgramRequest {
                    conversation_id: conversation_id.to_string(),
                    mini_program: to_json(mini_program)?,
                },
            )
            .await?;
        Ok(response.id)
    }

    /// Recall a sent message. Returns whether the service accepted it.
    pub async fn message_recall(&self, message_id: &str) -> Result<bool> {
        let response: MessageRecallResponse = self
            .stub()?
            .call(RemoteMethod::MessageRecall, id_request(message_id))
            .await?;
        Ok(response.success)
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Message payload with the type in canonical numbering.
    pub async fn message_payload(&self, message_id: &str) -> Result<MessagePayload> {
        let response: MessagePayloadResponse = self
            .stub()?
            .call(RemoteMethod::MessagePayload, id_request(message_id))
            .await?;
        response.try_into()
    }

    /// Contact id carried by a contact-card message.
    pub async fn message_contact(&self, message_id: &str) -> Result<String> {
        let response: IdResponse = self
            .stub()?
            .call(RemoteMethod::MessageContact, id_request(message_id))
            .await?;
        Ok(response.id)
    }

    pub async fn message_url(&self, message_id: &str) -> Result<UrlLinkPayload> {
        let response: MessageUrlResponse = self
            .stub()?
            .call(RemoteMethod::MessageUrl, id_request(message_id))
            .await?;
        from_json("url link", &response.url_link)
    }

    pub async fn message_mini_program(&self, message_id: &str) -> Result<MiniProgramPayload> {
        let response: MessageMiniProgramResponse = self
            .stub()?
            .call(RemoteMethod::MessageMiniProgram, id_request(message_id))
            .await?;
        from_json("mini program", &response.mini_program)
    }

    /// Download the attachment of a message.
    pub async fn message_file(&self, message_id: &str) -> Result<FileBox> {
        let chunks = self
            .stub()?
            .stream(RemoteMethod::MessageFileStream, id_request(message_id))
            .await?;
        collect_file_box(chunks).await
    }

    /// Download the image of a message at the requested resolution.
    pub async fn message_image(&self, message_id: &str, image_type: ImageType) -> Result<FileBox> {
        let chunks = self
            .stub()?
            .stream(
                RemoteMethod::MessageImageStream,
                MessageImageStreamRequest {
                    id: message_id.to_string(),
                    r#type: image_type as i32,
                },
            )
            .await?;
        collect_file_box(chunks).await
    }

    /// The service has no message search; always empty.
    pub async fn message_search(&self) -> Result<Vec<String>> {
        debug!("message_search is not supported by the service");
        Ok(Vec::new())
    }

    /// Re-send `message_id` to `conversation_id` with the primitive that
    /// matches its type.
    pub async fn message_forward(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<Option<String>> {
        let payload = self.message_payload(message_id).await?;
        debug!(message_id, message_type = ?payload.message_type, "Forwarding message");

        match payload.message_type {
            MessageType::Text => {
                if payload.text.is_empty() {
                    return Err(PuppetError::payload(format!(
                        "text message {message_id} has no text"
                    )));
                }
                self.message_send_text(conversation_id, &payload.text, &[])
                    .await
            }
            MessageType::Url => {
                let url_link = self.message_url(message_id).await?;
                self.message_send_url(conversation_id, &url_link).await
            }
            MessageType::MiniProgram => {
                let mini_program = self.message_mini_program(message_id).await?;
                self.message_send_mini_program(conversation_id, &mini_program)
                    .await
            }
            MessageType::Image => {
                let image = self.message_image(message_id, ImageType::Artwork).await?;
                self.message_send_file(conversation_id, &image).await
            }
            _ => {
                let file = self.message_file(message_id).await?;
                self.message_send_file(conversation_id, &file).await
            }
        }
    }
}

fn id_request(id: &str) -> IdRequest {
    IdRequest { id: id.to_string() }
}

/// Concatenate streamed chunks in arrival order. The first non-empty chunk
/// name names the file.
async fn collect_file_box(
    mut chunks: BoxStream<'static, std::result::Result<FileStreamResponse, TransportError>>,
) -> Result<FileBox> {
    let mut data = Vec::new();
    let mut name: Option<String> = None;
    let mut received = 0usize;

    while let Some(frame) = chunks.next().await {
        let Some(chunk) = frame?.file_box_chunk else {
            continue;
        };
        received += 1;
        data.extend_from_slice(&chunk.data);
        if name.is_none() {
            name = chunk.name.filter(|name| !name.is_empty());
        }
    }

    if received == 0 {
        return Err(PuppetError::payload("file stream carried no chunks"));
    }
    debug!(chunks = received, bytes = data.len(), "File stream reassembled");
    Ok(FileBox::from_bytes(&data, name.unwrap_or_default()))
}
