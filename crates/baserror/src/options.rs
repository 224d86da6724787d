//! Functional options for building and mutating a [`BaseError`].
//!
//! Each `with_*` function returns an [`Opt`]: a deferred write into an
//! option accumulator. Constructors, clones and wraps all run the same
//! protocol:
//!
//! 1. apply every option, in order, to a fresh accumulator;
//! 2. merge the accumulator into the error once (code, message, system,
//!    chain, cause, stack);
//! 3. if message arguments were supplied, format the now-current message
//!    as a template against them.
//!
//! An empty option list leaves the error untouched.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::config;
use crate::error::{BaseError, Cause};
use crate::stack::Stack;
use crate::template::{format_template, Arg};

/// Accumulated option values. `None` / empty means "not supplied".
#[derive(Default)]
pub(crate) struct ErrorOptions {
    code: Option<String>,
    msg: Option<String>,
    system: bool,
    chain: Vec<String>,
    cause: Option<Cause>,
    depth: Option<i32>,
    msg_args: Vec<Arg>,
}

/// One configuration step for a [`BaseError`].
///
/// Built by the `with_*` functions in this module.
pub struct Opt(Box<dyn FnOnce(&mut ErrorOptions) + Send>);

impl Opt {
    fn new(f: impl FnOnce(&mut ErrorOptions) + Send + 'static) -> Self {
        Opt(Box::new(f))
    }
}

impl fmt::Debug for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opt(..)")
    }
}

/// Set the code. An empty code is ignored.
pub fn with_code(code: impl Into<String>) -> Opt {
    let code = code.into();
    Opt::new(move |o| o.code = Some(code))
}

/// Set the message. An empty message is ignored.
pub fn with_msg(msg: impl Into<String>) -> Opt {
    let msg = msg.into();
    Opt::new(move |o| o.msg = Some(msg))
}

/// Set the message to `template` formatted against `args`, right away.
pub fn with_msg_format(template: &str, args: impl IntoIterator<Item = Arg>) -> Opt {
    let args: Vec<Arg> = args.into_iter().collect();
    let msg = format_template(template, &args);
    Opt::new(move |o| o.msg = Some(msg))
}

/// Fill the final message, used as a template, with `args`.
///
/// Formatting runs after every other option, so it applies to whichever
/// message ends up on the error.
///
/// ```
/// use baserror::{args, with_msg, with_msg_args, BaseError};
///
/// let err = BaseError::new("", [with_msg("%d-%s"), with_msg_args(args![7, "x"])]);
/// assert_eq!(err.message(), "7-x");
/// ```
pub fn with_msg_args(args: impl IntoIterator<Item = Arg>) -> Opt {
    let args: Vec<Arg> = args.into_iter().collect();
    Opt::new(move |o| o.msg_args = args)
}

/// Classify as a system fault.
pub fn with_system() -> Opt {
    Opt::new(|o| o.system = true)
}

/// Append chain labels.
pub fn with_chain<I, S>(labels: I) -> Opt
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    Opt::new(move |o| o.chain.extend(labels))
}

/// Set the wrapped underlying error.
pub fn with_cause<E>(cause: E) -> Opt
where
    E: StdError + Send + Sync + 'static,
{
    let cause: Cause = Arc::new(cause);
    Opt::new(move |o| o.cause = Some(cause))
}

/// Capture the caller's stack with the configured default depth.
pub fn with_stack() -> Opt {
    let depth = i32::try_from(config::global().stack_depth).unwrap_or(i32::MAX);
    Opt::new(move |o| o.depth = Some(depth))
}

/// Capture `depth` frames of the caller's stack. `depth <= 0` keeps one.
pub fn with_stack_depth(depth: i32) -> Opt {
    Opt::new(move |o| o.depth = Some(depth))
}

/// Run the option protocol against `err`.
pub(crate) fn apply_options<I>(err: &mut BaseError, opts: I)
where
    I: IntoIterator<Item = Opt>,
{
    let mut options = ErrorOptions::default();
    let mut supplied = 0usize;
    for Opt(apply) in opts {
        apply(&mut options);
        supplied += 1;
    }
    if supplied == 0 {
        return;
    }
    merge(err, options);
}

#[inline(never)]
fn merge(err: &mut BaseError, options: ErrorOptions) {
    let ErrorOptions {
        code,
        msg,
        system,
        chain,
        cause,
        depth,
        msg_args,
    } = options;

    if let Some(code) = code.filter(|c| !c.is_empty()) {
        err.code = code;
    }
    if let Some(msg) = msg.filter(|m| !m.is_empty()) {
        err.message = msg;
    }
    if system {
        err.system = true;
    }
    err.chain.extend(chain);
    if cause.is_some() {
        err.cause = cause;
    }
    if let Some(depth) = depth {
        err.stack = Some(Stack::capture(0, depth));
    }

    if !msg_args.is_empty() {
        err.message = format_template(&err.message, &msg_args);
    }

    tracing::trace!(
        code = %err.code,
        system = err.system,
        captured = depth.is_some(),
        "applied error options"
    );
}

impl BaseError {
    /// Re-run the option protocol on an existing error.
    ///
    /// Unlike the chained mutators, options never clear a field: an empty
    /// code or message is simply not applied.
    pub fn apply(&mut self, opts: impl IntoIterator<Item = Opt>) -> &mut Self {
        apply_options(self, opts);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use std::io;

    fn base(code: &str, msg: &str) -> BaseError {
        let mut err = BaseError::default();
        err.code = code.to_string();
        err.message = msg.to_string();
        err
    }

    #[test]
    fn no_options_is_passthrough() {
        let mut err = base("E1", "boom");
        err.system = true;
        err.chain = vec!["api".to_string(), "repo".to_string()];
        err.cause = Some(Arc::new(io::Error::new(io::ErrorKind::Other, "root")));
        err.stack = Some(Stack::capture(0, 2));
        let stack_before = err.stack.clone();

        err.apply([]);

        assert_eq!(err.code(), "E1");
        assert_eq!(err.message(), "boom");
        assert!(err.is_system());
        assert_eq!(err.chain(), ["api", "repo"]);
        assert_eq!(err.cause().map(ToString::to_string).as_deref(), Some("root"));
        assert_eq!(err.stack, stack_before);

        let mut bare = base("", "");
        bare.apply(Vec::new());
        assert!(!bare.is_system());
        assert!(bare.stack().is_none());
    }

    #[test]
    fn huge_stack_depth_is_safe() {
        let mut err = base("", "x");
        err.apply([with_stack_depth(i32::MAX)]);
        let trace = err.stack_trace();
        assert!(!trace.is_empty());
        assert!(trace[0].function.contains("huge_stack_depth_is_safe"), "{trace:?}");
    }

    #[test]
    fn oversized_template_width_renders_inline() {
        let mut err = base("", "%99999999999999999999s");
        err.apply([with_msg_args(args!["x"])]);
        assert_eq!(err.message(), "%!(BADWIDTH)x");
    }

    #[test]
    fn last_writer_wins() {
        let mut err = base("", "");
        err.apply([with_code("A"), with_msg("first"), with_code("B"), with_msg("second")]);
        assert_eq!(err.to_string(), "[B] second");
    }

    #[test]
    fn empty_values_are_not_supplied() {
        let mut err = base("E1", "keep");
        err.apply([with_code(""), with_msg("")]);
        assert_eq!(err.to_string(), "[E1] keep");
    }

    #[test]
    fn system_only_upgrades() {
        let mut err = base("", "x");
        err.apply([with_system()]);
        assert!(err.is_system());
        err.apply([with_code("C")]);
        assert!(err.is_system());
    }

    #[test]
    fn chain_appends_across_applications() {
        let mut err = base("", "x");
        err.apply([with_chain(["api"]), with_chain(["service", "repo"])]);
        err.apply([with_chain(vec![String::from("db")])]);
        assert_eq!(err.chain(), ["api", "service", "repo", "db"]);
        assert_eq!(err.chain_joined(), "api -> service -> repo -> db");
    }

    #[test]
    fn cause_replaced_only_when_supplied() {
        let mut err = base("", "x");
        err.apply([with_cause(io::Error::new(io::ErrorKind::Other, "first"))]);
        err.apply([with_code("C")]);
        assert_eq!(err.cause().map(ToString::to_string).as_deref(), Some("first"));

        err.apply([with_cause(io::Error::new(io::ErrorKind::Other, "second"))]);
        assert_eq!(err.cause().map(ToString::to_string).as_deref(), Some("second"));
    }

    #[test]
    fn msg_args_format_the_final_message() {
        let mut err = base("", "ignored %d");
        // Arguments are listed first, yet apply to the message set after them.
        err.apply([with_msg_args(args![7, "x"]), with_msg("%d-%s")]);
        assert_eq!(err.message(), "7-x");
    }

    #[test]
    fn msg_format_is_immediate() {
        let mut err = base("", "old");
        err.apply([with_msg_format("user %q missing", args!["ann"])]);
        assert_eq!(err.message(), "user \"ann\" missing");
    }

    #[test]
    fn msg_args_report_problems_inline() {
        let mut err = base("", "%d and %d");
        err.apply([with_msg_args(args![1])]);
        assert_eq!(err.message(), "1 and %!d(MISSING)");
    }

    #[test]
    fn stack_capture_respects_depth() {
        let mut err = base("", "x");
        err.apply([with_stack_depth(2)]);
        assert_eq!(err.stack().map(Stack::len), Some(2));

        err.apply([with_stack_depth(-1)]);
        assert_eq!(err.stack().map(Stack::len), Some(1));

        err.apply([with_stack()]);
        assert_eq!(
            err.stack().map(Stack::len),
            Some(config::global().stack_depth)
        );
    }

    #[test]
    fn captured_stack_starts_in_test() {
        let mut err = base("", "x");
        err.apply([with_stack_depth(1)]);
        let trace = err.stack_trace();
        assert!(
            trace[0].function.contains("captured_stack_starts_in_test"),
            "unexpected first frame: {trace:?}"
        );
    }

    #[test]
    fn opt_debug_is_opaque() {
        assert_eq!(format!("{:?}", with_system()), "Opt(..)");
    }
}
