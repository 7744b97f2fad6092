//! The inter-step verification state machine and its data model.
//!
//! A flow walks `Credentials → Pin → Otp → Complete` in order, one submission
//! in flight at a time. The engine in [`engine`] owns all transition logic;
//! [`validate`] holds the client-side shape checks that run before any
//! network call.

mod engine;
mod validate;

pub use engine::{dispatch, SubmitDisposition, VerificationFlow};
pub use validate::{validate_identifier, validate_payload, validate_secret, ValidationError};

use std::fmt;

use crate::api::{ApiError, VerifyOk};

/// Number of cells in a PIN entry
pub const PIN_LEN: usize = 4;
/// Number of cells in an OTP entry
pub const OTP_LEN: usize = 6;

/// One stage of the linear verification sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Identifier + secret entry
    Credentials,
    /// 4-digit PIN entry
    Pin,
    /// 6-digit one-time code entry
    Otp,
    /// Terminal state - the flow finished
    Complete,
}

impl Step {
    /// The step that follows this one, or `None` at the terminal state
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Credentials => Some(Step::Pin),
            Step::Pin => Some(Step::Otp),
            Step::Otp => Some(Step::Complete),
            Step::Complete => None,
        }
    }

    /// Fixed code length for code-entry steps
    pub fn code_len(self) -> Option<usize> {
        match self {
            Step::Pin => Some(PIN_LEN),
            Step::Otp => Some(OTP_LEN),
            Step::Credentials | Step::Complete => None,
        }
    }
}

/// The validated input a step submits to the verification service
#[derive(Clone, PartialEq, Eq)]
pub enum StepPayload {
    Credentials { identifier: String, secret: String },
    Pin(String),
    Otp(String),
}

impl StepPayload {
    /// The step this payload belongs to
    pub fn step(&self) -> Step {
        match self {
            StepPayload::Credentials { .. } => Step::Credentials,
            StepPayload::Pin(_) => Step::Pin,
            StepPayload::Otp(_) => Step::Otp,
        }
    }
}

// Manual Debug so secrets and codes never end up in logs or panic output
impl fmt::Debug for StepPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPayload::Credentials { identifier, .. } => f
                .debug_struct("Credentials")
                .field("identifier", identifier)
                .field("secret", &"***")
                .finish(),
            StepPayload::Pin(_) => f.debug_tuple("Pin").field(&"***").finish(),
            StepPayload::Otp(_) => f.debug_tuple("Otp").field(&"***").finish(),
        }
    }
}

/// Submission lifecycle for the current step, reset on every step entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    /// A submission is in flight; further submits are ignored until it
    /// resolves
    pub pending: bool,
    /// User-facing message from the last failed submission
    pub error: Option<String>,
}

/// Normalized outcome of a verification call, as applied to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success { identifier: Option<String> },
    Failure { reason: String },
}

impl From<Result<VerifyOk, ApiError>> for SubmissionResult {
    fn from(result: Result<VerifyOk, ApiError>) -> Self {
        match result {
            Ok(ok) => SubmissionResult::Success {
                identifier: ok.identifier,
            },
            Err(err) => SubmissionResult::Failure {
                reason: err.user_message(),
            },
        }
    }
}
