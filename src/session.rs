//! Session context carried across verification steps.
//!
//! The identifier captured when the credentials step succeeds is readable by
//! the later steps (for display only, never resubmitted) and is cleared when
//! the flow completes or is cancelled.

/// Flow-wide session state: single-writer (credentials success),
/// multi-reader (every later step).
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    identifier: Option<String>,
}

impl SessionContext {
    /// Create an empty context (no step has succeeded yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the verified identifier. Only the first write takes effect;
    /// the context is read-only for the rest of the flow.
    pub fn start(&mut self, identifier: String) {
        if self.identifier.is_none() {
            tracing::debug!("session started");
            self.identifier = Some(identifier);
        }
    }

    /// The identifier captured at the credentials step, if any
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Whether a session is active
    pub fn is_active(&self) -> bool {
        self.identifier.is_some()
    }

    /// Drop the carried identifier (flow complete or cancelled)
    pub fn clear(&mut self) {
        if self.identifier.take().is_some() {
            tracing::debug!("session cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let session = SessionContext::new();
        assert!(!session.is_active());
        assert_eq!(session.identifier(), None);
    }

    #[test]
    fn test_start_records_identifier() {
        let mut session = SessionContext::new();
        session.start("user@example.com".to_string());
        assert!(session.is_active());
        assert_eq!(session.identifier(), Some("user@example.com"));
    }

    #[test]
    fn test_first_write_wins() {
        let mut session = SessionContext::new();
        session.start("first@example.com".to_string());
        session.start("second@example.com".to_string());
        assert_eq!(session.identifier(), Some("first@example.com"));
    }

    #[test]
    fn test_clear() {
        let mut session = SessionContext::new();
        session.start("user@example.com".to_string());
        session.clear();
        assert!(!session.is_active());

        // Clearing again is harmless
        session.clear();
        assert_eq!(session.identifier(), None);
    }
}
