use std::fmt;

use super::{Cause, Error, ErrorCode, ErrorPolicy, Severity};

/// Wrap the error side of any `Result` into an [`Error`].
///
/// ```
/// use wire_error::{Code, ResultExt};
///
/// fn load() -> Result<String, wire_error::Error> {
///     std::fs::read_to_string("/definitely/not/here.toml").wrap_err(500, Code::Internal)
/// }
///
/// let err = load().unwrap_err();
/// assert_eq!(err.code(), "internal");
/// assert!(!err.root().is_empty());
/// ```
pub trait ResultExt<T> {
    fn wrap_err(self, class: i32, code: impl ErrorCode) -> Result<T, Error>;

    fn wrap_errf(self, class: i32, code: impl ErrorCode, args: fmt::Arguments<'_>)
    -> Result<T, Error>;
}

impl<T, E: Into<Cause>> ResultExt<T> for Result<T, E> {
    fn wrap_err(self, class: i32, code: impl ErrorCode) -> Result<T, Error> {
        self.map_err(|e| Error::wrap(e, class, code))
    }

    fn wrap_errf(
        self,
        class: i32,
        code: impl ErrorCode,
        args: fmt::Arguments<'_>,
    ) -> Result<T, Error> {
        self.map_err(|e| Error::wrapf(e, class, code, args))
    }
}

/// Policy-driven emission that leaves the result untouched.
///
/// At subsystem boundaries, pass errors through the application's
/// [`ErrorPolicy`] and keep handling the `Result` as usual.
pub trait EmitExt {
    /// Emit any error.
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self;

    /// Emit only errors the policy classifies as warnings.
    fn emit_warning(self, policy: &impl ErrorPolicy) -> Self;

    /// Emit only errors the policy classifies as errors.
    fn emit_error(self, policy: &impl ErrorPolicy) -> Self;
}

impl<T> EmitExt for Result<T, Error> {
    fn emit_event(self, policy: &impl ErrorPolicy) -> Self {
        if let Err(ref e) = self {
            policy.emit(e);
        }
        self
    }

    fn emit_warning(self, policy: &impl ErrorPolicy) -> Self {
        emit_at(self, policy, Severity::Warning)
    }

    fn emit_error(self, policy: &impl ErrorPolicy) -> Self {
        emit_at(self, policy, Severity::Error)
    }
}

fn emit_at<T>(
    result: Result<T, Error>,
    policy: &impl ErrorPolicy,
    severity: Severity,
) -> Result<T, Error> {
    if let Err(ref e) = result {
        if policy.classify(e) == severity {
            policy.emit(e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::Code;
    use crate::policy::tests::RecordingPolicy;

    #[test]
    fn wrap_err_keeps_structured_errors() {
        let inner = Error::new(404, Code::NotFound, "no invoice");
        let result: Result<(), Error> = Err(inner.clone());
        let err = result
            .wrap_errf(500, Code::Internal, format_args!("rendering {}", 7))
            .unwrap_err();
        assert_eq!(err.class(), 404);
        assert_eq!(err.code(), "not-found");
        assert_eq!(err.description(), "no invoice\nrendering 7");
        assert_eq!(err.stack(), inner.stack());
    }

    #[test]
    fn wrap_err_converts_foreign_errors() {
        let result: Result<u8, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "secrets.toml",
        ));
        let err = result.wrap_err(403, Code::PermissionDenied).unwrap_err();
        assert_eq!(err.root(), "secrets.toml");
        assert_eq!(err.class(), 403);
    }

    #[test]
    fn ok_values_pass_through() {
        let result: Result<u8, std::io::Error> = Ok(3);
        assert_eq!(result.wrap_err(500, Code::Internal).ok(), Some(3));
    }

    #[test]
    fn emission_respects_classification() {
        let recorder = RecordingPolicy::default();
        let seen = Arc::clone(&recorder.seen);

        let warning: Result<(), Error> = Err(Error::new(404, Code::NotFound, "gone"));
        let failure: Result<(), Error> = Err(Error::new(503, Code::Unavailable, "down"));

        let warning = warning.emit_error(&recorder).emit_warning(&recorder);
        let _ = failure.emit_warning(&recorder).emit_error(&recorder);
        let _ = Ok::<(), Error>(()).emit_event(&recorder);
        let _ = warning.emit_event(&recorder);

        assert_eq!(
            *seen.lock().expect("lock"),
            ["not-found", "unavailable", "not-found"]
        );
    }
}
