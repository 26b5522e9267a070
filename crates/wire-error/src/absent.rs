//! Accessors that also work when there is no error.
//!
//! Call sites often hold an `Option<Error>` (the result of a check that may
//! or may not have failed). [`OptionalError`] lets them render, inspect or
//! hand it on without matching first.

use crate::Error;

pub trait OptionalError {
    /// Transport string, or `""` when absent.
    fn error_string(&self) -> String;

    /// Error code, or `""` when absent.
    fn get_code(&self) -> &str;

    /// A boxed trait object, or `None` when absent. Never a box around
    /// nothing, so `is_none()` checks at call sites stay reliable.
    fn into_dyn(self) -> Option<Box<dyn std::error::Error + Send + Sync>>;
}

impl OptionalError for Option<Error> {
    fn error_string(&self) -> String {
        self.as_ref().error_string()
    }

    fn get_code(&self) -> &str {
        self.as_ref().map_or("", Error::code)
    }

    fn into_dyn(self) -> Option<Box<dyn std::error::Error + Send + Sync>> {
        self.map(|err| Box::new(err) as Box<dyn std::error::Error + Send + Sync>)
    }
}

impl OptionalError for Option<&Error> {
    fn error_string(&self) -> String {
        self.map(Error::to_string).unwrap_or_default()
    }

    fn get_code(&self) -> &str {
        self.map_or("", Error::code)
    }

    fn into_dyn(self) -> Option<Box<dyn std::error::Error + Send + Sync>> {
        self.cloned().into_dyn()
    }
}
