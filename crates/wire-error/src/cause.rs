use std::fmt;

use crate::Error;

/// What a wrap is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// No error at all; wrapping treats it as an empty structured error.
    Absent,
    Structured(Error),
    /// Message of an error this crate did not build.
    Foreign(String),
}

impl Cause {
    pub fn foreign(err: impl fmt::Display) -> Self {
        Cause::Foreign(err.to_string())
    }
}

impl From<Error> for Cause {
    fn from(err: Error) -> Self {
        Cause::Structured(err)
    }
}

impl From<Option<Error>> for Cause {
    fn from(err: Option<Error>) -> Self {
        err.map_or(Cause::Absent, Cause::Structured)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Cause {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<Error>() {
            Ok(structured) => Cause::Structured(*structured),
            Err(foreign) => Cause::foreign(foreign),
        }
    }
}

impl From<std::io::Error> for Cause {
    fn from(err: std::io::Error) -> Self {
        // An io::Error may itself carry one of ours.
        let carries_structured = err.get_ref().is_some_and(|inner| inner.is::<Error>());
        if !carries_structured {
            return Cause::foreign(err);
        }
        err.into_inner().map_or(Cause::Absent, Cause::from)
    }
}

impl From<serde_json::Error> for Cause {
    fn from(err: serde_json::Error) -> Self {
        Cause::foreign(err)
    }
}

impl From<fmt::Error> for Cause {
    fn from(err: fmt::Error) -> Self {
        Cause::foreign(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;

    #[test]
    fn boxed_structured_errors_are_recovered() {
        let err = Error::new(404, Code::NotFound, "no such invoice");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err.clone());
        assert_eq!(Cause::from(boxed), Cause::Structured(err));
    }

    #[test]
    fn boxed_foreign_errors_keep_their_message() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = "socket closed".into();
        assert_eq!(Cause::from(boxed), Cause::Foreign("socket closed".into()));
    }

    #[test]
    fn io_errors_unwrap_structured_payloads() {
        let err = Error::new(503, Code::Unavailable, "upstream down");
        let io = std::io::Error::other(err.clone());
        assert_eq!(Cause::from(io), Cause::Structured(err));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        assert_eq!(Cause::from(io), Cause::Foreign("config.toml".into()));
    }

    #[test]
    fn none_is_absent() {
        assert_eq!(Cause::from(None::<Error>), Cause::Absent);
    }
}
