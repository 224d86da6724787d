//! # baserror: structured errors
//!
//! A structured error value carrying a stable code, a human-readable
//! message, a business/system classification, chain labels, a wrapped
//! cause and an optional snapshot of the caller's stack.
//!
//! ## Design
//!
//! Every constructor funnels into one option protocol. Options are plain
//! values (`with_code`, `with_stack`, ...) applied in order to an
//! accumulator, then merged into the error once, so they behave the same
//! whether the error is built fresh, wrapped or cloned.
//!
//! Stack capture needs no skip count: captured frames are classified
//! against this crate's own source root, and the first frame outside it
//! (or inside one of its tests) is the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use baserror::{args, with_chain, with_msg_args, with_stack, BaseError, Render};
//!
//! fn load_user(id: u32) -> Result<(), BaseError> {
//!     Err(BaseError::new_code(
//!         "USR404",
//!         "user %d not found",
//!         [with_msg_args(args![id]), with_chain(["load_user"]), with_stack()],
//!     ))
//! }
//!
//! let err = load_user(7).unwrap_err();
//! assert_eq!(err.to_string(), "[USR404] user 7 not found");
//! assert_eq!(err.render(Render::Quoted), "\"[USR404] user 7 not found\"");
//! assert!(baserror::is_business_error(&err));
//!
//! // `{:#}` appends the stack and the cause chain.
//! let verbose = format!("{err:#}");
//! assert!(verbose.starts_with("[USR404] user 7 not found\n"));
//! ```
//!
//! ## Configuration
//!
//! | Variable | Default | Effect |
//! |----------|---------|--------|
//! | `BASERR_STACK_DEPTH` | 3 | frames kept by `with_stack()` |
//! | `BASERR_SCAN_LIMIT` | 15 | frames scanned for the caller |
//! | `BASERR_CAPTURE` | on | `0` disables stack capture |
//!
//! ## Feature Flags
//!
//! | Flag    | Effect |
//! |---------|--------|
//! | `serde` | `{code, msg}` serialized form (default) |

mod constructors;
mod convert;
mod env;
mod error;
mod options;
mod template;
#[cfg(feature = "serde")]
mod wire;

pub mod config;
pub mod frame;
pub mod stack;

// ── Public API ────────────────────────────────────────────────────

pub use config::{ConfigError, StackConfig};
pub use constructors::clone_from_error;
pub use convert::{BaseResult, OptionExt, ResultExt};
pub use error::{
    as_base_error, is_base_error, is_business_error, is_system_error, BaseError, Cause,
    Classified, Render, CAUSE_SEPARATOR, CHAIN_SEPARATOR,
};
pub use options::{
    with_cause, with_chain, with_code, with_msg, with_msg_args, with_msg_format, with_stack,
    with_stack_depth, with_system, Opt,
};
pub use stack::{Frame, FrameInfo, Stack};
pub use template::{format_template, Arg};
