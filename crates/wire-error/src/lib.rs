//! # wire-error
//!
//! Structured errors for service code that need to cross process and RPC
//! boundaries as plain strings.
//!
//! An [`Error`] carries a description, an HTTP-style class, a symbolic code,
//! the filtered call stack and timestamp of its creation, the message of the
//! foreign error it wrapped (if any) and a request id. Its `Display` form is
//! `#ERR ` followed by JSON, and [`decode`] turns that string back into an
//! equal value.
//!
//! ```
//! use wire_error::{decode, wrap_err, Code, Error};
//!
//! fn read_config() -> Result<String, Error> {
//!     std::fs::read_to_string("/nonexistent/app.toml")
//!         .map_err(|e| wrap_err!(e, 500, Code::Internal, "loading config"))
//! }
//!
//! let err = read_config().unwrap_err();
//! let wire = err.to_string();
//! assert!(wire.starts_with("#ERR "));
//! assert_eq!(decode(&wire), err);
//! ```
//!
//! Wrapping an error that is already structured never replaces its class,
//! code, stack or timestamp; it only fills what is unset and appends to the
//! description. See [`merge`] for the rules.

pub mod absent;
pub mod cause;
pub mod code;
pub mod codec;
pub mod error;
#[macro_use]
mod macros;
pub mod merge;
pub mod policy;
pub mod pretty;
pub mod result_ext;
pub mod severity;
pub mod stack;

// public exports
pub use absent::OptionalError;
pub use cause::Cause;
pub use code::{Code, ErrorCode, UnrecognisedCode, is_unset_code};
pub use codec::{DecodeError, SENTINEL, decode, encode, try_decode};
pub use error::{Error, new_request_id};
pub use merge::{Patch, merge};
pub use policy::{CombinedPolicy, ErrorPolicy, NoopPolicy};
#[cfg(feature = "tracing")]
pub use policy::TracingPolicy;
pub use pretty::{ErrorFields, PrettyDebug};
pub use result_ext::{EmitExt, ResultExt};
pub use severity::Severity;
pub use stack::{StackFilter, active_stack_filter, capture_stack, install_stack_filter};

pub type Result<T> = std::result::Result<T, Error>;
