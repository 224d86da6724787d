use std::error::Error as StdError;

use crate::error::BaseError;
use crate::options::Opt;

/// Convenience Result alias.
pub type BaseResult<T> = Result<T, BaseError>;

// ── ResultExt: wrap errors during propagation ────────────────────

/// Extension trait wrapping any `Result` error into a [`BaseError`].
///
/// The error's `Display` becomes the message and the error itself the
/// cause, exactly as with [`BaseError::wrap`].
///
/// ```
/// use baserror::{with_chain, with_stack, ResultExt};
///
/// fn parse(raw: &str) -> baserror::BaseResult<u16> {
///     raw.parse::<u16>().wrap_err([with_chain(["parse port"]), with_stack()])
/// }
///
/// let err = parse("http").unwrap_err();
/// assert_eq!(err.chain(), ["parse port"]);
/// assert!(err.cause().is_some());
/// ```
pub trait ResultExt<T> {
    /// Wrap as a business fault, applying `opts`.
    fn wrap_err<I>(self, opts: I) -> BaseResult<T>
    where
        I: IntoIterator<Item = Opt>;

    /// Wrap as a business fault carrying `code`.
    fn wrap_code(self, code: &str) -> BaseResult<T>;

    /// Wrap as a system fault, applying `opts`.
    fn wrap_system<I>(self, opts: I) -> BaseResult<T>
    where
        I: IntoIterator<Item = Opt>;
}

// `match` instead of `map_err`: a closure from core would sit between the
// caller and the capture point and be taken for the caller's frame.
impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_err<I>(self, opts: I) -> BaseResult<T>
    where
        I: IntoIterator<Item = Opt>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(BaseError::wrapped(String::new(), err, false, opts)),
        }
    }

    fn wrap_code(self, code: &str) -> BaseResult<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(BaseError::wrapped(code.to_string(), err, false, [])),
        }
    }

    fn wrap_system<I>(self, opts: I) -> BaseResult<T>
    where
        I: IntoIterator<Item = Opt>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(BaseError::wrapped(String::new(), err, true, opts)),
        }
    }
}

// ── OptionExt: absent values as errors ───────────────────────────

/// Turn `None` into a coded business fault.
pub trait OptionExt<T> {
    fn ok_or_code(self, code: &str, msg: &str) -> BaseResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_code(self, code: &str, msg: &str) -> BaseResult<T> {
        match self {
            Some(value) => Ok(value),
            None => Err(BaseError::new_code(code, msg, [])),
        }
    }
}
