//! Structured, log-friendly views of errors.
//!
//! The transport form packs the stack into one string and the creation time
//! into a bare integer. For humans and log pipelines that is awkward, so
//! [`PrettyDebug`] exposes a separate set of serializable fields.

use serde::Serialize;

use crate::Error;

/// Provide a structured view of an error for logging/UI.
pub trait PrettyDebug {
    type Fields<'a>: Serialize + 'a
    where
        Self: 'a;

    fn fields(&self) -> Self::Fields<'_>;

    fn to_value(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self.fields()).ok()
    }

    fn pretty_json(&self) -> Option<String> {
        serde_json::to_string_pretty(&self.fields()).ok()
    }

    /// Emit a tracing event with the structured fields attached.
    #[cfg(feature = "tracing")]
    fn emit_tracing(&self, level: tracing::Level, message: &str) {
        let fields = self.pretty_json().unwrap_or_default();
        if level == tracing::Level::ERROR {
            tracing::error!(fields = %fields, "{message}");
        } else if level == tracing::Level::WARN {
            tracing::warn!(fields = %fields, "{message}");
        } else if level == tracing::Level::INFO {
            tracing::info!(fields = %fields, "{message}");
        } else if level == tracing::Level::DEBUG {
            tracing::debug!(fields = %fields, "{message}");
        } else {
            tracing::trace!(fields = %fields, "{message}");
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorFields<'a> {
    pub class: i32,
    pub code: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub debug: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub root: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub request_id: &'a str,
    /// RFC 3339, absent when the error was never stamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub stack: Vec<&'a str>,
}

impl PrettyDebug for Error {
    type Fields<'a> = ErrorFields<'a>;

    fn fields(&self) -> Self::Fields<'_> {
        ErrorFields {
            class: self.class(),
            code: self.code(),
            description: self.description(),
            debug: self.debug(),
            root: self.root(),
            request_id: self.request_id(),
            created: self.created_at().map(|at| at.to_rfc3339()),
            stack: self.stack_frames().collect(),
        }
    }
}
