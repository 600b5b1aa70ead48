use async_trait::async_trait;

use crate::core::error::BackendError;
use crate::core::types::{BackendRequest, BackendResponse};

/// Backend client contract for issuing one blocking chat call.
///
/// Implementations make a single attempt and surface every failure as a
/// `BackendError`; the gateway neither retries nor inspects error bodies.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Sends `request` authenticated with `credential` and waits for the full answer.
    async fn chat(
        &self,
        request: &BackendRequest,
        credential: &str,
    ) -> Result<BackendResponse, BackendError>;
}
