//! Transport seam between the session controller and the network.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use puppet_shared::{PuppetError, TransportError};

use crate::endpoint::Endpoint;
use crate::method::RemoteMethod;

/// Server-streamed response frames, still protobuf-encoded.
pub type FrameStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// One live logical connection to the puppet service.
///
/// Unary calls and the event stream share the connection. After `close()`
/// every call fails with [`TransportError::Closed`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn unary(&self, method: RemoteMethod, request: Bytes) -> Result<Bytes, TransportError>;

    async fn server_streaming(
        &self,
        method: RemoteMethod,
        request: Bytes,
    ) -> Result<FrameStream, TransportError>;

    /// Release the connection. Idempotent.
    async fn close(&self);

    fn is_closed(&self) -> bool;
}

/// Opens transports to an endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
    ) -> Result<Arc<dyn Transport>, PuppetError>;
}
