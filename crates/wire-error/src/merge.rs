use crate::Error;
use crate::code::is_unset_code;

/// Classification and detail that a wrap wants to add to an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub class: i32,
    pub code: String,
    /// Extra description line; `None` or empty leaves the description as is.
    pub detail: Option<String>,
}

impl Patch {
    pub fn new(class: i32, code: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            class,
            code: code.into(),
            detail,
        }
    }
}

/// Fold `patch` into `existing`.
///
/// Class and code are first-write-wins: they are only filled while unset
/// (class `0`, code `""` or `"unknown"`). Detail is appended to the
/// description on a new line; an empty description takes the detail as is,
/// with no leading newline. Stack, creation time and root are never touched.
pub fn merge(mut existing: Error, patch: Patch) -> Error {
    if !patch.code.is_empty() && is_unset_code(&existing.code) {
        existing.code = patch.code;
    }

    if patch.class != 0 && existing.class == 0 {
        existing.class = patch.class;
    }

    if let Some(detail) = patch.detail.filter(|d| !d.is_empty()) {
        if existing.description.is_empty() {
            existing.description = detail;
        } else {
            existing.description.push('\n');
            existing.description.push_str(&detail);
        }
    }

    existing
}
