//! Transport encoding: `"#ERR "` followed by the JSON form of an [`Error`].
//!
//! The prefix tells a structured error apart from any other error string.
//! [`decode`] never fails: text without the prefix, or with a payload that
//! does not parse, still comes back as a well-formed [`Error`].

use std::str::FromStr;

use crate::Error;
use crate::code::Code;

pub const SENTINEL: &str = "#ERR ";

/// Class given to errors rebuilt from unusable transport strings.
const FALLBACK_CLASS: i32 = 500;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("missing \"#ERR \" prefix")]
    MissingSentinel,

    #[error("{source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

pub fn encode(err: &Error) -> String {
    // Only strings and integers: serialization cannot fail.
    match serde_json::to_string(err) {
        Ok(json) => format!("{SENTINEL}{json}"),
        Err(_) => SENTINEL.to_string(),
    }
}

/// Strict decoding, reporting why `text` is not a transport string.
pub fn try_decode(text: &str) -> Result<Error, DecodeError> {
    let payload = text
        .strip_prefix(SENTINEL)
        .ok_or(DecodeError::MissingSentinel)?;
    Ok(serde_json::from_str(payload)?)
}

/// Rebuild an error from its transport string.
///
/// - no prefix: class 500, code `unknown`, `text` as the description;
/// - prefix with a bad payload: class 500, code `json-marshal-error`, the
///   parse error and the full `text` as the description.
///
/// Both fallbacks are fresh errors with the caller's stack.
pub fn decode(text: &str) -> Error {
    match try_decode(text) {
        Ok(err) => err,
        Err(DecodeError::MissingSentinel) => Error::new(FALLBACK_CLASS, Code::Unknown, text),
        Err(DecodeError::Json { source }) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %source, "undecodable structured error payload");
            Error::newf(
                FALLBACK_CLASS,
                Code::JsonMarshalError,
                format_args!("{source}, {text}"),
            )
        }
    }
}

impl FromStr for Error {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        try_decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cause;

    #[test]
    fn encode_omits_zero_fields() {
        let err = crate::merge::merge(
            Error::default(),
            crate::Patch::new(404, "not-found", Some("no invoice 7".into())),
        );
        assert_eq!(
            encode(&err),
            r##"#ERR {"description":"no invoice 7","class":404,"code":"not-found"}"##
        );
        assert_eq!(encode(&Error::default()), "#ERR {}");
    }

    #[test]
    fn display_is_the_transport_form() {
        let err = Error::new(500, Code::Internal, "boom").with_request_id("req-9");
        assert_eq!(err.to_string(), encode(&err));
        assert!(err.to_string().starts_with(SENTINEL));
        assert!(err.to_string().contains(r#""request_id":"req-9""#));
    }

    #[test]
    fn plain_text_falls_back_to_unknown() {
        let err = decode("connection refused (os error 111)");
        assert_eq!(err.description(), "connection refused (os error 111)");
        assert_eq!(err.code(), "unknown");
        assert_eq!(err.class(), 500);
        assert!(err.created() > 0);
    }

    #[test]
    fn bad_payload_keeps_the_offending_text() {
        let err = decode("#ERR not-json");
        assert_eq!(err.code(), "json-marshal-error");
        assert_eq!(err.class(), 500);
        assert!(err.description().contains("#ERR not-json"), "{}", err.description());
    }

    #[test]
    fn try_decode_reports_the_reason() {
        assert!(matches!(try_decode("oops"), Err(DecodeError::MissingSentinel)));
        assert!(matches!(try_decode("#ERR [1"), Err(DecodeError::Json { .. })));
        assert!("#ERR {}".parse::<Error>().is_ok());
    }

    #[test]
    fn capitalised_keys_are_accepted() {
        let err = decode(r##"#ERR {"Description":"quota","Class":429,"Code":"rate-limited","RequestId":"r-1","unknown_field":true}"##);
        assert_eq!(err.description(), "quota");
        assert_eq!(err.class(), 429);
        assert_eq!(err.code(), "rate-limited");
        assert_eq!(err.request_id(), "r-1");
    }

    #[test]
    fn round_trip() {
        let err = Error::wrapf(
            Cause::foreign("socket closed"),
            502,
            Code::Unavailable,
            format_args!("calling {}", "ledger"),
        )
        .with_debug("attempt=3")
        .with_request_id("6f1c");
        assert_eq!(decode(&encode(&err)), err);
    }
}
