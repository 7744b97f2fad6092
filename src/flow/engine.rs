//! The verification flow engine.
//!
//! Submission is split in two so the UI loop never blocks on the network:
//! [`VerificationFlow::begin_submit`] claims the in-flight slot and hands
//! back a ticket, the caller performs the client call (typically on a
//! spawned task), and [`VerificationFlow::apply_result`] folds the outcome
//! back into the machine. [`VerificationFlow::submit`] combines the two for
//! sequential callers.

use std::sync::Arc;

use crate::api::VerificationClient;
use crate::session::SessionContext;

use super::{
    validate_payload, Step, StepPayload, SubmissionResult, SubmissionState, ValidationError,
};

/// What became of a `begin_submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// Pending claimed; the caller must run the client call and feed the
    /// outcome to `apply_result` with this ticket
    Dispatched(u64),
    /// Dropped without effect: a submission is already in flight, or the
    /// payload does not belong to the current step
    Ignored,
    /// Shape validation failed; nothing was dispatched and pending is unset
    Invalid(ValidationError),
}

/// The inter-step state machine: owns the current step, the session
/// context, and the submission lifecycle.
pub struct VerificationFlow {
    client: Arc<dyn VerificationClient>,
    step: Step,
    session: SessionContext,
    submission: SubmissionState,
    /// Identifier of the in-flight credentials submission, used when the
    /// service does not echo one back
    in_flight_identifier: Option<String>,
    /// Ticket of the submission whose result is still awaited
    live_ticket: Option<u64>,
    next_ticket: u64,
}

impl VerificationFlow {
    pub fn new(client: Arc<dyn VerificationClient>) -> Self {
        Self {
            client,
            step: Step::Credentials,
            session: SessionContext::new(),
            submission: SubmissionState::default(),
            in_flight_identifier: None,
            live_ticket: None,
            next_ticket: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_pending(&self) -> bool {
        self.submission.pending
    }

    /// Shared handle to the verification client, for dispatching on a task
    pub fn client(&self) -> Arc<dyn VerificationClient> {
        Arc::clone(&self.client)
    }

    /// Validate the payload and claim the submission slot.
    ///
    /// At most one submission per step may be in flight; a call while one
    /// is pending is a no-op. Validation failures never touch the pending
    /// flag and never reach the client.
    pub fn begin_submit(&mut self, payload: &StepPayload) -> SubmitDisposition {
        if self.submission.pending {
            tracing::debug!("submit ignored - already pending");
            return SubmitDisposition::Ignored;
        }
        if payload.step() != self.step {
            tracing::debug!(step = ?self.step, "submit ignored - payload for wrong step");
            return SubmitDisposition::Ignored;
        }
        if let Err(err) = validate_payload(payload) {
            return SubmitDisposition::Invalid(err);
        }

        self.submission.pending = true;
        self.submission.error = None;
        self.in_flight_identifier = match payload {
            StepPayload::Credentials { identifier, .. } => Some(identifier.clone()),
            _ => None,
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.live_ticket = Some(ticket);

        tracing::debug!(step = ?self.step, ticket = ticket, "submission dispatched");
        SubmitDisposition::Dispatched(ticket)
    }

    /// Fold a resolved submission back into the machine.
    ///
    /// Results for stale tickets (superseded or cancelled submissions) are
    /// discarded. Pending is always cleared for a live ticket, success or
    /// not, so the submit control can never stay disabled.
    pub fn apply_result(&mut self, ticket: u64, result: SubmissionResult) {
        if self.live_ticket != Some(ticket) {
            tracing::debug!(ticket = ticket, "discarding stale submission result");
            return;
        }
        self.live_ticket = None;
        self.submission.pending = false;

        match result {
            SubmissionResult::Success { identifier } => {
                if self.step == Step::Credentials {
                    let id = identifier.or_else(|| self.in_flight_identifier.take());
                    if let Some(id) = id {
                        self.session.start(id);
                    }
                }
                self.in_flight_identifier = None;
                self.advance();
            }
            SubmissionResult::Failure { reason } => {
                tracing::info!(step = ?self.step, "submission failed");
                self.in_flight_identifier = None;
                self.submission.error = Some(reason);
            }
        }
    }

    /// Begin, dispatch, and apply in one call. The UI uses the split form;
    /// this one suits sequential callers and tests.
    pub async fn submit(&mut self, payload: StepPayload) -> SubmitDisposition {
        match self.begin_submit(&payload) {
            SubmitDisposition::Dispatched(ticket) => {
                let client = Arc::clone(&self.client);
                let result = dispatch(client.as_ref(), &payload).await;
                self.apply_result(ticket, result);
                SubmitDisposition::Dispatched(ticket)
            }
            other => other,
        }
    }

    /// Abandon the flow: back to the credentials step with the session and
    /// submission state cleared. An in-flight network call is not aborted;
    /// its eventual result is discarded by the ticket guard.
    pub fn cancel(&mut self) {
        tracing::info!(step = ?self.step, "flow cancelled");
        self.live_ticket = None;
        self.in_flight_identifier = None;
        self.session.clear();
        self.submission = SubmissionState::default();
        self.step = Step::Credentials;
    }

    fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            tracing::info!(from = ?self.step, to = ?next, "step advanced");
            self.step = next;
            self.submission = SubmissionState::default();
            if self.step == Step::Complete {
                self.session.clear();
            }
        }
    }
}

/// Route a payload to the matching client operation and normalize the
/// outcome. Exactly one network call; no retry.
pub async fn dispatch(client: &dyn VerificationClient, payload: &StepPayload) -> SubmissionResult {
    let result = match payload {
        StepPayload::Credentials { identifier, secret } => {
            client.submit_credentials(identifier, secret).await
        }
        StepPayload::Pin(code) => client.submit_pin(code).await,
        StepPayload::Otp(code) => client.submit_otp(code).await,
    };
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::TRANSPORT_ERROR_MESSAGE;
    use crate::api::{ApiError, VerifyOk};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted client: pops one prepared outcome per call and records
    /// which operation was invoked.
    struct MockClient {
        script: Mutex<VecDeque<Result<VerifyOk, ApiError>>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockClient {
        fn new(script: Vec<Result<VerifyOk, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn pop(&self, call: &'static str) -> Result<VerifyOk, ApiError> {
            self.calls.lock().unwrap().push(call);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock script exhausted")
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VerificationClient for MockClient {
        async fn submit_credentials(
            &self,
            _identifier: &str,
            _secret: &str,
        ) -> Result<VerifyOk, ApiError> {
            self.pop("credentials")
        }

        async fn submit_pin(&self, _code: &str) -> Result<VerifyOk, ApiError> {
            self.pop("pin")
        }

        async fn submit_otp(&self, _code: &str) -> Result<VerifyOk, ApiError> {
            self.pop("otp")
        }
    }

    fn credentials_payload() -> StepPayload {
        StepPayload::Credentials {
            identifier: "user@example.com".to_string(),
            secret: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_credentials_success_advances_and_starts_session() {
        let mock = MockClient::new(vec![Ok(VerifyOk::default())]);
        let mut flow = VerificationFlow::new(mock.clone());

        let disposition = flow.submit(credentials_payload()).await;
        assert!(matches!(disposition, SubmitDisposition::Dispatched(_)));

        assert_eq!(flow.step(), Step::Pin);
        assert_eq!(flow.session().identifier(), Some("user@example.com"));
        // The next step enters with a fresh submission state
        assert_eq!(*flow.submission(), SubmissionState::default());
        assert_eq!(mock.calls(), vec!["credentials"]);
    }

    #[tokio::test]
    async fn test_service_echoed_identifier_wins() {
        let mock = MockClient::new(vec![Ok(VerifyOk {
            identifier: Some("canonical@example.com".to_string()),
        })]);
        let mut flow = VerificationFlow::new(mock);

        flow.submit(credentials_payload()).await;
        assert_eq!(flow.session().identifier(), Some("canonical@example.com"));
    }

    #[tokio::test]
    async fn test_pin_rejection_stays_on_step_with_reason() {
        let mock = MockClient::new(vec![
            Ok(VerifyOk::default()),
            Err(ApiError::rejected("invalid pin")),
        ]);
        let mut flow = VerificationFlow::new(mock);

        flow.submit(credentials_payload()).await;
        flow.submit(StepPayload::Pin("1234".to_string())).await;

        assert_eq!(flow.step(), Step::Pin);
        assert_eq!(flow.submission().error.as_deref(), Some("invalid pin"));
        assert!(!flow.is_pending());
        // Session survives a failed later step
        assert_eq!(flow.session().identifier(), Some("user@example.com"));
    }

    #[tokio::test]
    async fn test_full_flow_reaches_complete_and_clears_session() {
        let mock = MockClient::new(vec![
            Ok(VerifyOk::default()),
            Ok(VerifyOk::default()),
            Ok(VerifyOk::default()),
        ]);
        let mut flow = VerificationFlow::new(mock.clone());

        flow.submit(credentials_payload()).await;
        flow.submit(StepPayload::Pin("1234".to_string())).await;
        assert_eq!(flow.step(), Step::Otp);
        flow.submit(StepPayload::Otp("123456".to_string())).await;

        assert_eq!(flow.step(), Step::Complete);
        assert!(!flow.session().is_active());
        assert_eq!(mock.calls(), vec!["credentials", "pin", "otp"]);
    }

    #[tokio::test]
    async fn test_short_otp_never_reaches_client() {
        let mock = MockClient::new(vec![Ok(VerifyOk::default()), Ok(VerifyOk::default())]);
        let mut flow = VerificationFlow::new(mock.clone());

        flow.submit(credentials_payload()).await;
        flow.submit(StepPayload::Pin("1234".to_string())).await;

        let disposition = flow.submit(StepPayload::Otp("1234".to_string())).await;
        assert_eq!(
            disposition,
            SubmitDisposition::Invalid(ValidationError::CodeShape {
                label: "OTP",
                expected: 6,
            })
        );
        assert!(!flow.is_pending());
        assert_eq!(flow.step(), Step::Otp);
        assert_eq!(mock.calls(), vec!["credentials", "pin"]);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_ignored() {
        let mock = MockClient::new(vec![Ok(VerifyOk::default())]);
        let mut flow = VerificationFlow::new(mock.clone());

        let payload = credentials_payload();
        let first = flow.begin_submit(&payload);
        let ticket = match first {
            SubmitDisposition::Dispatched(t) => t,
            other => panic!("expected dispatch, got {:?}", other),
        };
        assert!(flow.is_pending());

        // The guard holds for the whole in-flight interval
        assert_eq!(flow.begin_submit(&payload), SubmitDisposition::Ignored);

        let result = dispatch(mock.as_ref(), &payload).await;
        flow.apply_result(ticket, result);
        assert!(!flow.is_pending());
        assert_eq!(mock.calls(), vec!["credentials"]);
    }

    #[tokio::test]
    async fn test_payload_for_wrong_step_is_ignored() {
        let mock = MockClient::new(vec![]);
        let mut flow = VerificationFlow::new(mock.clone());

        let disposition = flow.submit(StepPayload::Pin("1234".to_string())).await;
        assert_eq!(disposition, SubmitDisposition::Ignored);
        assert_eq!(flow.step(), Step::Credentials);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_generic_message_on_later_steps() {
        let mock = MockClient::new(vec![
            Ok(VerifyOk::default()),
            Err(ApiError::network("connection refused")),
        ]);
        let mut flow = VerificationFlow::new(mock);

        flow.submit(credentials_payload()).await;
        flow.submit(StepPayload::Pin("1234".to_string())).await;

        assert_eq!(flow.step(), Step::Pin);
        assert_eq!(
            flow.submission().error.as_deref(),
            Some(TRANSPORT_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_cancel_resets_flow_and_discards_in_flight_result() {
        let mock = MockClient::new(vec![Ok(VerifyOk::default()), Ok(VerifyOk::default())]);
        let mut flow = VerificationFlow::new(mock.clone());

        flow.submit(credentials_payload()).await;
        assert_eq!(flow.step(), Step::Pin);

        let payload = StepPayload::Pin("1234".to_string());
        let ticket = match flow.begin_submit(&payload) {
            SubmitDisposition::Dispatched(t) => t,
            other => panic!("expected dispatch, got {:?}", other),
        };

        flow.cancel();
        assert_eq!(flow.step(), Step::Credentials);
        assert!(!flow.session().is_active());
        assert_eq!(*flow.submission(), SubmissionState::default());

        // The network call was not aborted; its late result must not move
        // the machine
        let result = dispatch(mock.as_ref(), &payload).await;
        flow.apply_result(ticket, result);
        assert_eq!(flow.step(), Step::Credentials);
        assert!(!flow.is_pending());
    }

    #[tokio::test]
    async fn test_resubmission_after_failure_recovers() {
        let mock = MockClient::new(vec![
            Ok(VerifyOk::default()),
            Err(ApiError::rejected("invalid pin")),
            Ok(VerifyOk::default()),
        ]);
        let mut flow = VerificationFlow::new(mock);

        flow.submit(credentials_payload()).await;
        flow.submit(StepPayload::Pin("9999".to_string())).await;
        assert_eq!(flow.submission().error.as_deref(), Some("invalid pin"));

        flow.submit(StepPayload::Pin("1234".to_string())).await;
        assert_eq!(flow.step(), Step::Otp);
        assert_eq!(flow.submission().error, None);
    }
}
