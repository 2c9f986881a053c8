//! gRPC connection helpers.

use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tonic::Request;

use devlink_proto::devlink_service_client::DevlinkServiceClient;

pub async fn connect(
    server: &str,
) -> Result<DevlinkServiceClient<Channel>, tonic::transport::Error> {
    DevlinkServiceClient::connect(server.to_string()).await
}

/// Wrap a message in a request carrying the stored bearer token.
pub fn with_token<T>(message: T, token: &str) -> Result<Request<T>, crate::client::ClientError> {
    let mut request = Request::new(message);
    let value = MetadataValue::try_from(format!("Bearer {}", token))
        .map_err(|_| crate::client::ClientError::Transport("invalid session token".to_string()))?;
    request.metadata_mut().insert("authorization", value);
    Ok(request)
}
