use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cause::Cause;
use crate::code::{Code, ErrorCode};
use crate::merge::{Patch, merge};
use crate::stack::capture_stack;

/// A structured error that survives being turned into a string.
///
/// Besides a description it carries an HTTP-style `class`, a symbolic
/// `code`, the filtered call stack and creation time of the first
/// construction, the message of a wrapped foreign error (`root`) and an
/// optional request id.
///
/// `Display` renders the transport form (`#ERR {...}`), so the value can be
/// sent through any layer that only knows how to carry error strings and be
/// rebuilt on the other side with [`crate::decode`].
///
/// ```
/// use wire_error::{Code, Error};
///
/// let err = Error::newf(500, Code::Unknown, format_args!("db timeout after {}ms", 200));
/// let err = Error::wrapf(err, 503, Code::Unavailable, format_args!("loading invoice {}", 7));
///
/// assert_eq!(err.class(), 500);
/// assert_eq!(err.code(), "unavailable");
/// assert_eq!(err.description(), "db timeout after 200ms\nloading invoice 7");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Error {
    #[serde(skip_serializing_if = "String::is_empty", alias = "Description")]
    pub(crate) description: String,
    #[serde(skip_serializing_if = "String::is_empty", alias = "Debug")]
    pub(crate) debug: String,
    #[serde(skip_serializing_if = "is_zero_i32", alias = "Class")]
    pub(crate) class: i32,
    #[serde(skip_serializing_if = "String::is_empty", alias = "Stack")]
    pub(crate) stack: String,
    /// Nanoseconds since the Unix epoch.
    #[serde(skip_serializing_if = "is_zero_i64", alias = "Created")]
    pub(crate) created: i64,
    #[serde(skip_serializing_if = "String::is_empty", alias = "Code")]
    pub(crate) code: String,
    #[serde(skip_serializing_if = "String::is_empty", alias = "Root")]
    pub(crate) root: String,
    #[serde(skip_serializing_if = "String::is_empty", alias = "RequestId")]
    pub(crate) request_id: String,
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

// ── Constructors ──────────────────────────────────────────────────

impl Error {
    /// Build a fresh error and record the caller's stack.
    pub fn new(class: i32, code: impl ErrorCode, message: impl fmt::Display) -> Self {
        Self::fresh(class, code.as_str(), message.to_string())
    }

    /// Like [`Error::new`] with a `format_args!` message; see also [`crate::new_err!`].
    pub fn newf(class: i32, code: impl ErrorCode, args: fmt::Arguments<'_>) -> Self {
        Self::fresh(class, code.as_str(), fmt::format(args))
    }

    /// Description is every value's `Display` output, concatenated.
    pub fn from_values(class: i32, code: impl ErrorCode, values: &[&dyn fmt::Display]) -> Self {
        Self::fresh(class, code.as_str(), concat_values(values))
    }

    /// Wrap `cause` without adding a description line.
    ///
    /// - structured cause: class and code are filled if still unset, the
    ///   value is otherwise returned as it was (same stack, same timestamp);
    /// - foreign cause: a fresh error is built and the foreign message is
    ///   kept in `root`;
    /// - absent cause: an empty error receives the class and code.
    pub fn wrap(cause: impl Into<Cause>, class: i32, code: impl ErrorCode) -> Self {
        Self::wrap_with(cause.into(), class, code.as_str(), None)
    }

    /// [`Error::wrap`], appending a formatted line to the description.
    pub fn wrapf(
        cause: impl Into<Cause>,
        class: i32,
        code: impl ErrorCode,
        args: fmt::Arguments<'_>,
    ) -> Self {
        Self::wrap_with(cause.into(), class, code.as_str(), Some(fmt::format(args)))
    }

    pub fn wrap_values(
        cause: impl Into<Cause>,
        class: i32,
        code: impl ErrorCode,
        values: &[&dyn fmt::Display],
    ) -> Self {
        Self::wrap_with(cause.into(), class, code.as_str(), Some(concat_values(values)))
    }

    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = debug.into();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    fn wrap_with(cause: Cause, class: i32, code: &str, detail: Option<String>) -> Self {
        match cause {
            Cause::Absent => merge(Self::default(), Patch::new(class, code, detail)),
            Cause::Structured(err) => merge(err, Patch::new(class, code, detail)),
            Cause::Foreign(message) => {
                let description = match detail {
                    Some(detail) if !detail.is_empty() => detail,
                    _ => message.clone(),
                };
                let mut err = Self::fresh(class, code, description);
                err.root = message;
                err
            }
        }
    }

    fn fresh(class: i32, code: &str, description: String) -> Self {
        let stamped = Self {
            stack: capture_stack(1),
            created: now_nanos(),
            ..Self::default()
        };
        merge(stamped, Patch::new(class, code, Some(description)))
    }
}

fn concat_values(values: &[&dyn fmt::Display]) -> String {
    values.iter().map(|value| value.to_string()).collect()
}

fn now_nanos() -> i64 {
    // Out of range only after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// A fresh random request id for callers that do not get one from upstream.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ── Accessors ─────────────────────────────────────────────────────

impl Error {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn debug(&self) -> &str {
        &self.debug
    }

    pub fn class(&self) -> i32 {
        self.class
    }

    /// Newline-terminated `path:line` frames, innermost first.
    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn stack_frames(&self) -> impl Iterator<Item = &str> {
        self.stack.lines()
    }

    /// Nanoseconds since the Unix epoch; `0` when never stamped.
    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if self.created == 0 {
            return None;
        }
        let secs = self.created.div_euclid(1_000_000_000);
        let nanos = self.created.rem_euclid(1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nanos)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The code as a table entry, if it is one.
    pub fn code_kind(&self) -> Option<Code> {
        self.code.parse().ok()
    }

    pub fn has_code(&self, code: impl ErrorCode) -> bool {
        self.code == code.as_str()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::encode(self))
    }
}

impl std::error::Error for Error {}
