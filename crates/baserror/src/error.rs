use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::stack::{FrameInfo, Stack};
use crate::template::{format_template, Arg};

/// Shared, type-erased cause.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Separator used by [`BaseError::chain_joined`].
pub const CHAIN_SEPARATOR: &str = " -> ";

/// Line separating an error from its cause in the verbose form.
pub const CAUSE_SEPARATOR: &str = "\n---cause---\n";

/// A structured error value.
///
/// Carries a short identifying `code`, a human-readable `message`, a
/// business/system classification, human-authored chain labels, an
/// optional wrapped cause and an optional captured stack.
///
/// Rendering:
///
/// | Form | How | Output |
/// |------|-----|--------|
/// | plain | `{}` / [`Render::Plain`] | `[code] message` (`message` when uncoded) |
/// | verbose | `{:#}` / [`Render::Verbose`] | plain + stack + `---cause---` + cause, recursively |
/// | quoted | [`Render::Quoted`] | plain form as an escaped string literal |
///
/// ```
/// use baserror::{with_chain, BaseError};
///
/// let err = BaseError::new_code("E1", "boom", [with_chain(["load config"])]);
/// assert_eq!(err.to_string(), "[E1] boom");
/// assert_eq!(err.chain(), ["load config"]);
/// ```
#[derive(Default)]
pub struct BaseError {
    pub(crate) code: String,
    pub(crate) message: String,
    pub(crate) system: bool,
    pub(crate) chain: Vec<String>,
    pub(crate) cause: Option<Cause>,
    pub(crate) stack: Option<Stack>,
}

/// Output style for [`BaseError::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Render {
    /// `[code] message`
    #[default]
    Plain,
    /// Plain form, stack frames, then the cause chain.
    Verbose,
    /// Plain form as a quoted string literal.
    Quoted,
}

// ── Accessors ─────────────────────────────────────────────────────

impl BaseError {
    /// Identifying code. Empty when uncoded.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `true` for system faults, `false` for business faults.
    #[inline]
    pub fn is_system(&self) -> bool {
        self.system
    }

    /// Chain labels in the order they were added.
    #[inline]
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// Chain labels joined with [`CHAIN_SEPARATOR`].
    pub fn chain_joined(&self) -> String {
        self.chain.join(CHAIN_SEPARATOR)
    }

    /// The wrapped underlying error, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The captured stack, if a capture was requested.
    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    /// Resolved `(function, file, line)` frames; empty without a stack.
    pub fn stack_trace(&self) -> Vec<FrameInfo> {
        self.stack.as_ref().map(Stack::trace).unwrap_or_default()
    }
}

// ── Mutators ──────────────────────────────────────────────────────
//
// Chained, by-value counterparts of the `with_*` options. They write the
// field unconditionally; an empty code or message here clears it.

impl BaseError {
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    /// Treat the current message as a template and fill it with `args`.
    pub fn with_msg_args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        let args: Vec<Arg> = args.into_iter().collect();
        if !args.is_empty() {
            self.message = format_template(&self.message, &args);
        }
        self
    }

    /// Replace the message with `template` formatted against `args`.
    pub fn with_msg_format(mut self, template: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        let args: Vec<Arg> = args.into_iter().collect();
        self.message = format_template(template, &args);
        self
    }

    /// Mark as a system fault. There is no way back to business.
    pub fn with_system(mut self) -> Self {
        self.system = true;
        self
    }

    /// Append chain labels.
    pub fn with_chain<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chain.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Capture the stack with the configured default depth.
    #[inline(never)]
    pub fn with_stack(mut self) -> Self {
        let depth = crate::config::global().stack_depth;
        self.stack = Some(Stack::capture(0, i32::try_from(depth).unwrap_or(i32::MAX)));
        self
    }

    /// Capture `depth` frames. `depth <= 0` keeps a single frame.
    #[inline(never)]
    pub fn with_stack_depth(mut self, depth: i32) -> Self {
        self.stack = Some(Stack::capture(0, depth));
        self
    }
}

// ── Rendering ─────────────────────────────────────────────────────

impl BaseError {
    /// `[code] message`, or just `message` when uncoded.
    pub fn short_form(&self) -> String {
        self.to_string()
    }

    /// Short form, stack frames, then the cause chain.
    pub fn verbose_form(&self) -> String {
        format!("{self:#}")
    }

    /// Short form as an escaped, double-quoted string literal.
    pub fn quoted_form(&self) -> String {
        format!("{:?}", self.short_form())
    }

    /// Single entry point for every textual form.
    pub fn render(&self, style: Render) -> String {
        match style {
            Render::Plain => self.short_form(),
            Render::Verbose => self.verbose_form(),
            Render::Quoted => self.quoted_form(),
        }
    }

    fn write_short(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }

    fn write_verbose(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_short(f)?;
        if let Some(stack) = &self.stack {
            write!(f, "{stack}")?;
        }
        if let Some(cause) = &self.cause {
            f.write_str(CAUSE_SEPARATOR)?;
            match cause.downcast_ref::<BaseError>() {
                Some(inner) => inner.write_verbose(f)?,
                None => write!(f, "{cause:#}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.write_verbose(f)
        } else {
            self.write_short(f)
        }
    }
}

impl fmt::Debug for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("BaseError");
        d.field("code", &self.code);
        d.field("message", &self.message);
        d.field("system", &self.system);

        if !self.chain.is_empty() {
            d.field("chain", &self.chain);
        }
        if let Some(cause) = &self.cause {
            d.field("cause", &cause.to_string());
        }
        if let Some(stack) = &self.stack {
            d.field("stack", &format_args!("<{} frames>", stack.len()));
        }

        d.finish()
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl StdError for BaseError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

// ── Classification ────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::BaseError {}
}

/// Errors that carry a business/system classification.
///
/// Sealed: [`BaseError`] is the only implementor.
pub trait Classified: sealed::Sealed + StdError {
    fn is_system(&self) -> bool;

    fn is_business(&self) -> bool {
        !self.is_system()
    }
}

impl Classified for BaseError {
    #[inline]
    fn is_system(&self) -> bool {
        self.system
    }
}

/// View a generic error as a [`BaseError`], if it is one.
pub fn as_base_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a BaseError> {
    err.downcast_ref::<BaseError>()
}

fn classified<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a dyn Classified> {
    as_base_error(err).map(|e| e as &dyn Classified)
}

/// Is `err` a structured [`BaseError`]?
pub fn is_base_error(err: &(dyn StdError + 'static)) -> bool {
    as_base_error(err).is_some()
}

/// Is `err` a [`BaseError`] classified as a system fault?
pub fn is_system_error(err: &(dyn StdError + 'static)) -> bool {
    classified(err).is_some_and(|e| e.is_system())
}

/// Is `err` a [`BaseError`] classified as a business fault?
///
/// Foreign errors are neither system nor business faults.
pub fn is_business_error(err: &(dyn StdError + 'static)) -> bool {
    classified(err).is_some_and(|e| e.is_business())
}
