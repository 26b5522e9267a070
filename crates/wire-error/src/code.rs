//! Symbolic error codes.
//!
//! Constructors only need the string form of a code, so they accept anything
//! implementing [`ErrorCode`]. The closed [`Code`] table covers the codes this
//! crate produces itself plus the common service-level ones.
//!
//! An empty string and `"unknown"` both count as "no code yet": a later wrap
//! is allowed to replace them.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// String form of [`Code::Unknown`].
pub const UNKNOWN: &str = "unknown";

/// Returns true when `code` does not carry a real classification.
pub fn is_unset_code(code: &str) -> bool {
    code.is_empty() || code == UNKNOWN
}

/// Anything that can be rendered to a stable code string.
pub trait ErrorCode {
    fn as_str(&self) -> &str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Code {
    Unknown,
    /// A transport string carried the sentinel but its payload did not parse.
    JsonMarshalError,
    Internal,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Unauthenticated,
    Timeout,
    Unavailable,
    Conflict,
    RateLimited,
}

impl Code {
    pub const ALL: [Code; 12] = [
        Code::Unknown,
        Code::JsonMarshalError,
        Code::Internal,
        Code::InvalidArgument,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::Unauthenticated,
        Code::Timeout,
        Code::Unavailable,
        Code::Conflict,
        Code::RateLimited,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Code::Unknown => UNKNOWN,
            Code::JsonMarshalError => "json-marshal-error",
            Code::Internal => "internal",
            Code::InvalidArgument => "invalid-argument",
            Code::NotFound => "not-found",
            Code::AlreadyExists => "already-exists",
            Code::PermissionDenied => "permission-denied",
            Code::Unauthenticated => "unauthenticated",
            Code::Timeout => "timeout",
            Code::Unavailable => "unavailable",
            Code::Conflict => "conflict",
            Code::RateLimited => "rate-limited",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised error code: {0:?}")]
pub struct UnrecognisedCode(pub String);

impl FromStr for Code {
    type Err = UnrecognisedCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Code::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnrecognisedCode(s.to_string()))
    }
}

impl ErrorCode for Code {
    fn as_str(&self) -> &str {
        Code::as_str(self)
    }
}

impl ErrorCode for &str {
    fn as_str(&self) -> &str {
        self
    }
}

impl ErrorCode for String {
    fn as_str(&self) -> &str {
        self
    }
}

impl ErrorCode for Cow<'_, str> {
    fn as_str(&self) -> &str {
        self
    }
}

impl<C: ErrorCode> ErrorCode for Option<C> {
    fn as_str(&self) -> &str {
        self.as_ref().map_or("", ErrorCode::as_str)
    }
}
