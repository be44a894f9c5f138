//! tonic-backed implementation of [`Transport`] and [`Connector`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use puppet_shared::constants::{AUTHORIZATION_SCHEME, CONNECT_TIMEOUT_SECS};
use puppet_shared::{PuppetError, TransportError};
use tonic::client::Grpc;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint as ChannelEndpoint};
use tonic::{Code, Request, Status};
use tracing::{debug, info};

use crate::codec::RawCodec;
use crate::discovery::ping_endpoint;
use crate::endpoint::Endpoint;
use crate::method::RemoteMethod;
use crate::transport::{Connector, FrameStream, Transport};

/// Map a gRPC status to the transport error taxonomy.
///
/// `Unavailable` and `Cancelled` describe the connection, not the request,
/// and are reported as transient connection failures.
pub fn status_to_error(status: Status) -> TransportError {
    match status.code() {
        Code::Unavailable | Code::Cancelled => {
            TransportError::Connection(status.message().to_string())
        }
        code => TransportError::Status {
            code: format!("{code:?}"),
            message: status.message().to_string(),
        },
    }
}

pub struct GrpcTransport {
    channel: Mutex<Option<Channel>>,
    authorization: Option<MetadataValue<Ascii>>,
}

impl GrpcTransport {
    pub fn new(channel: Channel, authorization: Option<MetadataValue<Ascii>>) -> Self {
        Self {
            channel: Mutex::new(Some(channel)),
            authorization,
        }
    }

    fn client(&self) -> Result<Grpc<Channel>, TransportError> {
        let guard = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone().map(Grpc::new).ok_or(TransportError::Closed)
    }

    fn request(&self, body: Bytes) -> Request<Bytes> {
        let mut request = Request::new(body);
        if let Some(value) = &self.authorization {
            request.metadata_mut().insert("authorization", value.clone());
        }
        request
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn unary(&self, method: RemoteMethod, request: Bytes) -> Result<Bytes, TransportError> {
        let mut grpc = self.client()?;
        grpc.ready()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let response = grpc
            .unary(
                self.request(request),
                PathAndQuery::from_static(method.path()),
                RawCodec,
            )
            .await
            .map_err(status_to_error)?;
        Ok(response.into_inner())
    }

    async fn server_streaming(
        &self,
        method: RemoteMethod,
        request: Bytes,
    ) -> Result<FrameStream, TransportError> {
        let mut grpc = self.client()?;
        grpc.ready()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let response = grpc
            .server_streaming(
                self.request(request),
                PathAndQuery::from_static(method.path()),
                RawCodec,
            )
            .await
            .map_err(status_to_error)?;

        debug!(method = method.name(), "Server stream opened");
        Ok(response
            .into_inner()
            .map(|frame| frame.map_err(status_to_error))
            .boxed())
    }

    async fn close(&self) {
        let channel = self
            .channel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if channel.is_some() {
            debug!("gRPC channel released");
        }
    }

    fn is_closed(&self) -> bool {
        self.channel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Opens [`GrpcTransport`]s after probing the endpoint over TCP.
#[derive(Debug, Clone, Default)]
pub struct GrpcConnector;

#[async_trait]
impl Connector for GrpcConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
    ) -> Result<Arc<dyn Transport>, PuppetError> {
        ping_endpoint(endpoint).await?;

        let authorization = token
            .map(|token| {
                format!("{AUTHORIZATION_SCHEME} {token}")
                    .parse::<MetadataValue<Ascii>>()
                    .map_err(|_| {
                        PuppetError::Configuration("token is not valid ASCII metadata".to_string())
                    })
            })
            .transpose()?;

        let channel = ChannelEndpoint::from_shared(format!("http://{}", endpoint.authority()))
            .map_err(|e| PuppetError::Configuration(format!("invalid endpoint uri: {e}")))?
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect()
            .await
            .map_err(|e| PuppetError::Transport(TransportError::Connection(e.to_string())))?;

        info!(endpoint = %endpoint, "Connected to puppet service");
        Ok(Arc::new(GrpcTransport::new(channel, authorization)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_is_connection_error() {
        let err = status_to_error(Status::unavailable("connection reset"));
        assert_eq!(err, TransportError::Connection("connection reset".to_string()));
        assert!(err.is_transient());
    }

    #[test]
    fn test_other_codes_are_remote_status() {
        let err = status_to_error(Status::not_found("no such room"));
        assert_eq!(
            err,
            TransportError::Status {
                code: "NotFound".to_string(),
                message: "no such room".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_closed_transport_rejects_calls() {
        let channel = ChannelEndpoint::from_static("http://127.0.0.1:9").connect_lazy();
        let transport = GrpcTransport::new(channel, None);
        assert!(!transport.is_closed());

        transport.close().await;
        transport.close().await;
        assert!(transport.is_closed());

        let err = transport
            .unary(RemoteMethod::Ding, Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Closed);
    }

    #[tokio::test]
    async fn test_request_carries_authorization() {
        let channel = ChannelEndpoint::from_static("http://127.0.0.1:9").connect_lazy();
        let value: MetadataValue<Ascii> = "Wechaty abc".parse().unwrap();
        let transport = GrpcTransport::new(channel, Some(value));

        let request = transport.request(Bytes::from_static(b"x"));
        assert_eq!(
            request.metadata().get("authorization").unwrap().to_str().unwrap(),
            "Wechaty abc"
        );
    }

    #[tokio::test]
    async fn test_connector_fails_fast_on_unreachable_endpoint() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = GrpcConnector
            .connect(&Endpoint::new("127.0.0.1", port), Some("token"))
            .await;
        assert!(matches!(result, Err(PuppetError::Configuration(_))));
    }
}
