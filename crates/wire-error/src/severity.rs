//! Coarse-grained classification for programmatic handling of errors.
//!
//! Derived from the HTTP-style class:
//! - Warning: 4xx, the caller asked for something that cannot be done
//! - Error: everything else, including an unset class

use crate::Error;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn from_class(class: i32) -> Self {
        match class {
            400..=499 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl Error {
    pub fn severity(&self) -> Severity {
        Severity::from_class(self.class)
    }
}
