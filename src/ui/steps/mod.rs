//! One screen per verification step.
//!
//! Screens are presentational: they own their entry widgets and inline
//! validation messages, and hand a validated [`crate::flow::StepPayload`]
//! back to the app on Enter. No transition logic lives here.

mod complete;
mod credentials;
mod otp;
mod pin;

pub use complete::CompleteScreen;
pub use credentials::CredentialsScreen;
pub use otp::OtpScreen;
pub use pin::PinScreen;
