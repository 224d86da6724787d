//! Constructors: fresh, system, wrapping and cloning.
//!
//! Every entry point builds a base value and hands it to the option
//! protocol in [`crate::options`], so an option behaves the same no matter
//! how the error came to be.

use std::error::Error as StdError;
use std::sync::Arc;

use crate::error::BaseError;
use crate::options::{apply_options, Opt};

impl BaseError {
    fn build<I>(code: String, message: String, system: bool, opts: I) -> Self
    where
        I: IntoIterator<Item = Opt>,
    {
        let mut err = BaseError {
            code,
            message,
            system,
            ..Default::default()
        };
        apply_options(&mut err, opts);
        err
    }

    /// Business fault with a message and no code.
    ///
    /// ```
    /// use baserror::{with_code, BaseError};
    ///
    /// assert_eq!(BaseError::new("plain", []).to_string(), "plain");
    /// assert_eq!(BaseError::new("boom", [with_code("E1")]).to_string(), "[E1] boom");
    /// ```
    pub fn new(msg: impl Into<String>, opts: impl IntoIterator<Item = Opt>) -> Self {
        Self::build(String::new(), msg.into(), false, opts)
    }

    /// Business fault with a code and a message.
    pub fn new_code(
        code: impl Into<String>,
        msg: impl Into<String>,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Self {
        Self::build(code.into(), msg.into(), false, opts)
    }

    /// System fault with a message and no code.
    pub fn new_system(msg: impl Into<String>, opts: impl IntoIterator<Item = Opt>) -> Self {
        Self::build(String::new(), msg.into(), true, opts)
    }

    /// System fault with a code and a message.
    pub fn new_system_code(
        code: impl Into<String>,
        msg: impl Into<String>,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Self {
        Self::build(code.into(), msg.into(), true, opts)
    }

    /// Wrap an underlying error: its `Display` becomes the message and the
    /// error itself becomes the cause.
    pub(crate) fn wrapped<E, I>(code: String, err: E, system: bool, opts: I) -> Self
    where
        E: StdError + Send + Sync + 'static,
        I: IntoIterator<Item = Opt>,
    {
        let mut base = BaseError {
            code,
            message: err.to_string(),
            system,
            cause: Some(Arc::new(err)),
            ..Default::default()
        };
        apply_options(&mut base, opts);
        base
    }

    /// Wrap `err` as a business fault. `None` in, `None` out.
    ///
    /// ```
    /// use std::io;
    /// use baserror::BaseError;
    ///
    /// let io = io::Error::new(io::ErrorKind::NotFound, "no such file");
    /// let err = BaseError::wrap(Some(io), []).unwrap();
    /// assert_eq!(err.to_string(), "no such file");
    /// assert!(err.cause().is_some());
    ///
    /// assert!(BaseError::wrap(None::<io::Error>, []).is_none());
    /// ```
    pub fn wrap<E>(err: Option<E>, opts: impl IntoIterator<Item = Opt>) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        let err = err?;
        Some(Self::wrapped(String::new(), err, false, opts))
    }

    /// Wrap `err` as a system fault.
    pub fn wrap_system<E>(err: Option<E>, opts: impl IntoIterator<Item = Opt>) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        let err = err?;
        Some(Self::wrapped(String::new(), err, true, opts))
    }

    /// Wrap `err` as a business fault carrying `code`.
    pub fn wrap_code<E>(
        code: impl Into<String>,
        err: Option<E>,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        let err = err?;
        Some(Self::wrapped(code.into(), err, false, opts))
    }

    /// Wrap `err` as a system fault carrying `code`.
    pub fn wrap_system_code<E>(
        code: impl Into<String>,
        err: Option<E>,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Option<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        let err = err?;
        Some(Self::wrapped(code.into(), err, true, opts))
    }

    /// Copy code, message, classification, chain and cause, then apply
    /// `opts`. The stack is never copied.
    pub fn clone_with(&self, opts: impl IntoIterator<Item = Opt>) -> Self {
        let mut err = BaseError {
            code: self.code.clone(),
            message: self.message.clone(),
            system: self.system,
            chain: self.chain.clone(),
            cause: self.cause.clone(),
            stack: None,
        };
        apply_options(&mut err, opts);
        err
    }
}

/// Clone without the stack.
impl Clone for BaseError {
    fn clone(&self) -> Self {
        self.clone_with([])
    }
}

/// Clone an optional error; see [`BaseError::clone_with`].
pub fn clone_from_error(
    err: Option<&BaseError>,
    opts: impl IntoIterator<Item = Opt>,
) -> Option<BaseError> {
    err.map(|e| e.clone_with(opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{with_cause, with_chain, with_code, with_msg, with_stack_depth, with_system};
    use crate::{is_base_error, is_business_error, is_system_error};
    use std::io;

    fn io_err(msg: &str) -> io::Error {
        io::Error::new(io::ErrorKind::Other, msg.to_string())
    }

    #[test]
    fn fresh_constructors() {
        let plain = BaseError::new("plain", []);
        assert_eq!(plain.to_string(), "plain");
        assert!(!plain.is_system());
        assert!(plain.stack().is_none());

        let coded = BaseError::new_code("E1", "boom", []);
        assert_eq!(coded.to_string(), "[E1] boom");

        let system = BaseError::new_system("db down", []);
        assert!(system.is_system());

        let both = BaseError::new_system_code("DB", "db down", [with_chain(["startup"])]);
        assert_eq!(both.to_string(), "[DB] db down");
        assert!(both.is_system());
        assert_eq!(both.chain(), ["startup"]);
    }

    #[test]
    fn options_cannot_downgrade_system() {
        let err = BaseError::new_system("x", [with_code("C")]);
        assert!(err.is_system());
    }

    #[test]
    fn every_constructor_yields_base_error() {
        let errs = [
            BaseError::new("a", []),
            BaseError::new_code("B", "b", []),
            BaseError::new_system("c", []),
            BaseError::new_system_code("D", "d", []),
        ];
        for err in &errs {
            assert!(is_base_error(err));
            assert_ne!(is_system_error(err), is_business_error(err));
        }
    }

    #[test]
    fn wrap_none_is_none() {
        assert!(BaseError::wrap(None::<io::Error>, [with_code("X")]).is_none());
        assert!(BaseError::wrap_system(None::<io::Error>, []).is_none());
        assert!(BaseError::wrap_code("X", None::<io::Error>, []).is_none());
        assert!(BaseError::wrap_system_code("X", None::<io::Error>, []).is_none());
    }

    #[test]
    fn wrap_takes_message_and_cause() {
        let err = BaseError::wrap_code("IO", Some(io_err("disk full")), []).unwrap();
        assert_eq!(err.to_string(), "[IO] disk full");
        assert_eq!(err.cause().map(ToString::to_string).as_deref(), Some("disk full"));
        assert!(!err.is_system());

        let err = BaseError::wrap_system_code("IO", Some(io_err("disk full")), []).unwrap();
        assert!(err.is_system());
    }

    #[test]
    fn wrap_options_override_message() {
        let err = BaseError::wrap(Some(io_err("raw")), [with_msg("friendly")]).unwrap();
        assert_eq!(err.message(), "friendly");
        assert_eq!(err.cause().map(ToString::to_string).as_deref(), Some("raw"));
    }

    #[test]
    fn wrap_base_error_keeps_it_reachable() {
        let inner = BaseError::new_code("IN", "inner", []);
        let outer = BaseError::wrap_code("OUT", Some(inner), []).unwrap();
        assert_eq!(outer.to_string(), "[OUT] [IN] inner");

        let source = outer.source().and_then(crate::as_base_error);
        assert_eq!(source.map(BaseError::code), Some("IN"));
    }

    #[test]
    fn clone_copies_fields_but_not_stack() {
        let original = BaseError::new_system_code(
            "E1",
            "boom",
            [
                with_chain(["a", "b"]),
                with_cause(io_err("root")),
                with_stack_depth(2),
            ],
        );
        assert!(original.stack().is_some());

        let copy = original.clone();
        assert_eq!(copy.code(), "E1");
        assert_eq!(copy.message(), "boom");
        assert!(copy.is_system());
        assert_eq!(copy.chain(), ["a", "b"]);
        assert_eq!(copy.cause().map(ToString::to_string).as_deref(), Some("root"));
        assert!(copy.stack().is_none());
    }

    #[test]
    fn clone_with_applies_options() {
        let original = BaseError::new_code("E1", "boom", []);
        let copy = original.clone_with([with_system(), with_chain(["retry"]), with_stack_depth(1)]);

        assert!(copy.is_system());
        assert_eq!(copy.chain(), ["retry"]);
        assert_eq!(copy.stack().map(|s| s.len()), Some(1));
        assert!(!original.is_system());
        assert!(original.chain().is_empty());
    }

    #[test]
    fn clone_from_error_handles_none() {
        assert!(clone_from_error(None, [with_code("X")]).is_none());

        let original = BaseError::new("x", []);
        let copy = clone_from_error(Some(&original), [with_code("X")]);
        assert_eq!(copy.map(|e| e.to_string()).as_deref(), Some("[X] x"));
    }
}
