/// Build a fresh [`Error`](crate::Error) with a `format!`-style message.
///
/// ```
/// use wire_error::{new_err, Code};
///
/// let ms = 200;
/// let err = new_err!(500, Code::Unknown, "db timeout after {ms}ms");
/// assert_eq!(err.description(), "db timeout after 200ms");
/// ```
#[macro_export]
macro_rules! new_err {
    ($class:expr, $code:expr, $($arg:tt)+) => {
        $crate::Error::newf($class, $code, ::std::format_args!($($arg)+))
    };
}

/// Wrap a cause into an [`Error`](crate::Error), optionally appending a
/// `format!`-style line to the description.
///
/// ```
/// use wire_error::{new_err, wrap_err, Code};
///
/// let inner = new_err!(404, Code::NotFound, "no invoice {}", 7);
/// let err = wrap_err!(inner, 500, Code::Internal, "rendering page {}", 2);
/// assert_eq!(err.class(), 404);
/// assert_eq!(err.description(), "no invoice 7\nrendering page 2");
///
/// let bare = wrap_err!(std::io::Error::other("eof"), 502, Code::Unavailable);
/// assert_eq!(bare.root(), "eof");
/// ```
#[macro_export]
macro_rules! wrap_err {
    ($cause:expr, $class:expr, $code:expr $(,)?) => {
        $crate::Error::wrap($cause, $class, $code)
    };
    ($cause:expr, $class:expr, $code:expr, $($arg:tt)+) => {
        $crate::Error::wrapf($cause, $class, $code, ::std::format_args!($($arg)+))
    };
}
