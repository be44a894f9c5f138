// Transport layer: endpoint resolution and the gRPC session to the puppet service.

pub mod codec;
pub mod discovery;
pub mod endpoint;
pub mod grpc;
pub mod method;
pub mod stub;
pub mod transport;

pub use discovery::{ping_endpoint, resolve_endpoint};
pub use endpoint::Endpoint;
pub use grpc::{GrpcConnector, GrpcTransport};
pub use method::RemoteMethod;
pub use stub::PuppetStub;
pub use transport::{Connector, FrameStream, Transport};
