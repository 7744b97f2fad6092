//! HTTP implementation of the verification client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ApiError;
use super::{VerificationClient, VerifyOk};

/// Default reasons shown when a rejection response carries no detail
const REASON_CREDENTIALS: &str = "Incorrect email or password";
const REASON_PIN: &str = "Incorrect PIN";
const REASON_OTP: &str = "Incorrect code";

/// Client for the verification service over HTTP.
///
/// Success contract, applied uniformly to all three endpoints: any 2xx
/// response is success; 400/401/403/422 are semantic rejections with the
/// reason taken from the body's `error` field when present; anything else
/// is treated as a transport-class failure.
pub struct HttpVerificationClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    identifier: &'a str,
    secret: &'a str,
}

#[derive(Serialize)]
struct PinRequest<'a> {
    pin: &'a str,
}

#[derive(Serialize)]
struct OtpRequest<'a> {
    otp: &'a str,
}

/// Lenient view of a verification response body. Both fields are optional;
/// the status code alone decides the outcome.
#[derive(Deserialize, Default)]
struct VerifyResponse {
    identifier: Option<String>,
    error: Option<String>,
}

impl HttpVerificationClient {
    /// Create a client against the given base address
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("passgate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        fallback_reason: &str,
    ) -> Result<VerifyOk, ApiError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        tracing::debug!(path = path, "submitting verification request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        Self::interpret(status, &text, fallback_reason)
    }

    /// Map an HTTP status and response body to the normalized outcome
    fn interpret(status: u16, body: &str, fallback_reason: &str) -> Result<VerifyOk, ApiError> {
        let parsed: VerifyResponse = serde_json::from_str(body).unwrap_or_default();

        match status {
            200..=299 => Ok(VerifyOk {
                identifier: parsed.identifier,
            }),
            400 | 401 | 403 | 422 => {
                let reason = parsed
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| fallback_reason.to_string());
                Err(ApiError::rejected(reason))
            }
            status => {
                let message: String = body.chars().take(200).collect();
                Err(ApiError::http(status, message))
            }
        }
    }
}

#[async_trait]
impl VerificationClient for HttpVerificationClient {
    async fn submit_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<VerifyOk, ApiError> {
        let body = CredentialsRequest { identifier, secret };
        let result = self.post("/", &body, REASON_CREDENTIALS).await;

        // The credentials endpoint may omit the identifier from its body;
        // callers fall back to the value they submitted.
        if let Err(ref err) = result {
            tracing::warn!(error = %err, "credentials submission failed");
        }
        result
    }

    async fn submit_pin(&self, code: &str) -> Result<VerifyOk, ApiError> {
        let body = PinRequest { pin: code };
        let result = self.post("/pin", &body, REASON_PIN).await;
        if let Err(ref err) = result {
            tracing::warn!(error = %err, "pin submission failed");
        }
        result
    }

    async fn submit_otp(&self, code: &str) -> Result<VerifyOk, ApiError> {
        let body = OtpRequest { otp: code };
        let result = self.post("/otp", &body, REASON_OTP).await;
        if let Err(ref err) = result {
            tracing::warn!(error = %err, "otp submission failed");
        }
        result
    }
}
