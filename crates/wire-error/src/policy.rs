//! Policies for classifying and emitting errors.
//!
//! Library code returns [`crate::Error`] and leaves presentation to the
//! application, which installs an [`ErrorPolicy`] at its boundaries:
//! - tracing logs
//! - an event bus
//! - custom telemetry
//!
//! ```rust,ignore
//! use wire_error::{Error, ErrorPolicy, Severity};
//!
//! struct PrintPolicy;
//! impl ErrorPolicy for PrintPolicy {
//!     fn classify(&self, e: &Error) -> Severity { e.severity() }
//!     fn emit(&self, e: &Error) { eprintln!("[{:?}] {}", self.classify(e), e.description()); }
//! }
//! ```
use super::{Error, Severity};

pub trait ErrorPolicy: Send + Sync {
    fn classify(&self, error: &Error) -> Severity;

    fn emit(&self, error: &Error);
}

/// Classifies by class and emits nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopPolicy;

impl ErrorPolicy for NoopPolicy {
    fn classify(&self, error: &Error) -> Severity {
        error.severity()
    }

    fn emit(&self, _error: &Error) {}
}

/// Emits one `tracing` event per error, at WARN or ERROR.
///
/// The stack goes out as its own field so log pipelines can fold it.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Default)]
pub struct TracingPolicy;

#[cfg(feature = "tracing")]
impl ErrorPolicy for TracingPolicy {
    fn classify(&self, error: &Error) -> Severity {
        error.severity()
    }

    fn emit(&self, error: &Error) {
        match self.classify(error) {
            Severity::Warning => tracing::warn!(
                class = error.class(),
                code = error.code(),
                request_id = error.request_id(),
                root = error.root(),
                stack = error.stack(),
                "{}",
                error.description()
            ),
            Severity::Error => tracing::error!(
                class = error.class(),
                code = error.code(),
                request_id = error.request_id(),
                root = error.root(),
                stack = error.stack(),
                "{}",
                error.description()
            ),
        }
    }
}

/// Delegates to several policies.
///
/// - classify: the highest severity among inner policies (the error's own
///   severity when empty)
/// - emit: every inner policy, in insertion order
#[derive(Default)]
pub struct CombinedPolicy {
    policies: Vec<Box<dyn ErrorPolicy>>,
}

impl CombinedPolicy {
    pub fn new() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    pub fn push<P: ErrorPolicy + 'static>(mut self, policy: P) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn add_boxed(mut self, policy: Box<dyn ErrorPolicy>) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl ErrorPolicy for CombinedPolicy {
    fn classify(&self, error: &Error) -> Severity {
        self.policies
            .iter()
            .map(|p| p.classify(error))
            .max()
            .unwrap_or_else(|| error.severity())
    }

    fn emit(&self, error: &Error) {
        for p in &self.policies {
            p.emit(error);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::Code;

    /// Records emitted codes and reports a fixed severity.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingPolicy {
        pub(crate) fixed: Option<Severity>,
        pub(crate) seen: Arc<Mutex<Vec<String>>>,
    }

    impl ErrorPolicy for RecordingPolicy {
        fn classify(&self, error: &Error) -> Severity {
            self.fixed.unwrap_or_else(|| error.severity())
        }

        fn emit(&self, error: &Error) {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(error.code().to_string());
            }
        }
    }

    #[test]
    fn combined_takes_the_highest_severity() {
        let warning = Error::new(404, Code::NotFound, "gone");
        let combined = CombinedPolicy::new().push(NoopPolicy).push(RecordingPolicy {
            fixed: Some(Severity::Error),
            ..Default::default()
        });
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.classify(&warning), Severity::Error);
        assert_eq!(CombinedPolicy::new().classify(&warning), Severity::Warning);
    }

    #[test]
    fn combined_emits_to_every_policy() {
        let err = Error::new(503, Code::Unavailable, "upstream down");
        let recorder = RecordingPolicy::default();
        let seen = Arc::clone(&recorder.seen);
        let combined = CombinedPolicy::new()
            .push(recorder)
            .add_boxed(Box::new(NoopPolicy));
        combined.emit(&err);
        combined.emit(&err);
        assert_eq!(*seen.lock().expect("lock"), ["unavailable", "unavailable"]);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_policy_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let err = Error::new(500, Code::Internal, "boom").with_request_id("req-3");
        TracingPolicy.emit(&err);
        TracingPolicy.emit(&Error::new(400, Code::InvalidArgument, "bad qty"));
    }
}
