//! Typed request stub over a [`Transport`].

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use prost::Message;
use puppet_shared::protocol::{Empty, EventResponse};
use puppet_shared::TransportError;

use crate::method::RemoteMethod;
use crate::transport::Transport;

/// Cheap handle for issuing requests on the live transport.
#[derive(Clone)]
pub struct PuppetStub {
    transport: Arc<dyn Transport>,
}

impl PuppetStub {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Unary call with protobuf request and response messages.
    pub async fn call<Req, Resp>(
        &self,
        method: RemoteMethod,
        request: Req,
    ) -> Result<Resp, TransportError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        debug_assert!(!method.is_streaming(), "{method} is a streaming method");
        let body = Bytes::from(request.encode_to_vec());
        let frame = self.transport.unary(method, body).await?;
        decode_frame(method, frame)
    }

    /// Server-streaming call; every frame is decoded as `Resp`.
    pub async fn stream<Req, Resp>(
        &self,
        method: RemoteMethod,
        request: Req,
    ) -> Result<BoxStream<'static, Result<Resp, TransportError>>, TransportError>
    where
        Req: Message,
        Resp: Message + Default + 'static,
    {
        debug_assert!(method.is_streaming(), "{method} is a unary method");
        let body = Bytes::from(request.encode_to_vec());
        let frames = self.transport.server_streaming(method, body).await?;
        Ok(frames
            .map(move |frame| frame.and_then(|frame| decode_frame(method, frame)))
            .boxed())
    }

    /// Open the inbound event stream.
    pub async fn event_stream(
        &self,
    ) -> Result<BoxStream<'static, Result<EventResponse, TransportError>>, TransportError> {
        self.stream(RemoteMethod::Event, Empty {}).await
    }

    pub async fn close(&self) {
        self.transport.close().await;
    }
}

fn decode_frame<Resp: Message + Default>(
    method: RemoteMethod,
    frame: Bytes,
) -> Result<Resp, TransportError> {
    Resp::decode(frame).map_err(|e| TransportError::Frame {
        method: method.name(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream;
    use puppet_shared::protocol::{DingRequest, IdsResponse};
    use std::sync::Mutex;

    use crate::transport::FrameStream;

    /// Echoes unary requests and streams back a fixed set of frames.
    #[derive(Default)]
    struct EchoTransport {
        calls: Mutex<Vec<RemoteMethod>>,
        frames: Vec<Bytes>,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn unary(&self, method: RemoteMethod, request: Bytes) -> Result<Bytes, TransportError> {
            self.calls.lock().unwrap().push(method);
            Ok(request)
        }

        async fn server_streaming(
            &self,
            method: RemoteMethod,
            _request: Bytes,
        ) -> Result<FrameStream, TransportError> {
            self.calls.lock().unwrap().push(method);
            let frames: Vec<Result<Bytes, TransportError>> =
                self.frames.iter().cloned().map(Ok).collect();
            Ok(stream::iter(frames).boxed())
        }

        async fn close(&self) {}

        fn is_closed(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_call_round_trips_typed_messages() {
        let transport = Arc::new(EchoTransport::default());
        let stub = PuppetStub::new(transport.clone());

        let echoed: DingRequest = stub
            .call(
                RemoteMethod::Ding,
                DingRequest {
                    data: "ping".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(echoed.data, "ping");
        assert_eq!(*transport.calls.lock().unwrap(), vec![RemoteMethod::Ding]);
    }

    #[tokio::test]
    async fn test_empty_frame_decodes_to_defaults() {
        let stub = PuppetStub::new(Arc::new(EchoTransport::default()));
        let ids: IdsResponse = stub
            .call(RemoteMethod::RoomList, Empty {})
            .await
            .unwrap();
        assert!(ids.ids.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_frame_names_method() {
        // A lone field key with no value is a truncated frame.
        let transport = Arc::new(EchoTransport {
            frames: vec![Bytes::from_static(&[0x0a])],
            ..Default::default()
        });
        let stub = PuppetStub::new(transport);
        let mut events = stub.event_stream().await.unwrap();
        let err = events.next().await.unwrap().unwrap_err();
        assert!(matches!(err, TransportError::Frame { method: "Event", .. }));
    }

    #[tokio::test]
    async fn test_event_stream_decodes_envelopes() {
        let envelope = EventResponse {
            r#type: 25,
            payload: r#"{"contactId":"wxid_1"}"#.to_string(),
        };
        let transport = Arc::new(EchoTransport {
            frames: vec![Bytes::from(envelope.encode_to_vec())],
            ..Default::default()
        });
        let stub = PuppetStub::new(transport.clone());

        let events: Vec<_> = stub.event_stream().await.unwrap().collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap(), &envelope);
        assert_eq!(*transport.calls.lock().unwrap(), vec![RemoteMethod::Event]);
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "is a unary method")]
    async fn test_stream_rejects_unary_method() {
        let stub = PuppetStub::new(Arc::new(EchoTransport::default()));
        let _ = stub.stream::<_, Empty>(RemoteMethod::Ding, Empty {}).await;
    }
}
