//! Client-side shape validation, run before any network call.
//!
//! Validation failures never set the pending flag and never reach the
//! verification client; they surface inline at the input layer.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::{StepPayload, OTP_LEN, PIN_LEN};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    // Shape check only; deliverability is the service's problem
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

/// A step input that fails its shape constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmptyIdentifier,
    #[error("Invalid email address")]
    InvalidIdentifier,
    #[error("Password is required")]
    EmptySecret,
    #[error("{label} must be exactly {expected} digits")]
    CodeShape {
        label: &'static str,
        expected: usize,
    },
}

/// Validate the identifier field of the credentials step
pub fn validate_identifier(identifier: &str) -> Result<(), ValidationError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if !EMAIL_RE.is_match(identifier) {
        return Err(ValidationError::InvalidIdentifier);
    }
    Ok(())
}

/// Validate the secret field of the credentials step
pub fn validate_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.is_empty() {
        return Err(ValidationError::EmptySecret);
    }
    Ok(())
}

fn validate_code(code: &str, label: &'static str, expected: usize) -> Result<(), ValidationError> {
    if code.len() != expected || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::CodeShape { label, expected });
    }
    Ok(())
}

/// Validate a full step payload
pub fn validate_payload(payload: &StepPayload) -> Result<(), ValidationError> {
    match payload {
        StepPayload::Credentials { identifier, secret } => {
            validate_identifier(identifier)?;
            validate_secret(secret)
        }
        StepPayload::Pin(code) => validate_code(code, "PIN", PIN_LEN),
        StepPayload::Otp(code) => validate_code(code, "OTP", OTP_LEN),
    }
}
