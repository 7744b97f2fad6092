//! Verification service client boundary
//!
//! One operation per flow step, each a single network call with no implicit
//! retry. Implementations normalize every failure into [`ApiError`]: transport
//! problems and unexpected statuses on one side, semantic rejections (the
//! service reached a verdict and said no) on the other.

pub mod error;
mod http;

pub use error::ApiError;
pub use http::HttpVerificationClient;

use async_trait::async_trait;

/// Successful outcome of a verification call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOk {
    /// Identifier echoed back by the service, when the endpoint returns one.
    /// Only the credentials endpoint is expected to populate this.
    pub identifier: Option<String>,
}

/// Client for the remote verification service, one operation per step
#[async_trait]
pub trait VerificationClient: Send + Sync {
    /// Submit the credentials step (identifier + secret)
    async fn submit_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<VerifyOk, ApiError>;

    /// Submit the PIN step (4-digit code)
    async fn submit_pin(&self, code: &str) -> Result<VerifyOk, ApiError>;

    /// Submit the OTP step (6-digit code)
    async fn submit_otp(&self, code: &str) -> Result<VerifyOk, ApiError>;
}
