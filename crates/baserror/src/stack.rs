//! Call-stack snapshots.
//!
//! A [`Stack`] holds raw instruction pointers captured at construction time.
//! Symbol resolution is deferred until the stack is rendered or turned into
//! a [`FrameInfo`] trace, so capturing stays cheap for errors that are never
//! printed.
//!
//! # Capture
//!
//! ```text
//! backtrace::trace ──► [walker frames][library frames][caller][caller's caller]..
//!                                                       ▲
//!                                   find_boundary ──────┘  keep `depth` frames
//! ```

use std::ffi::c_void;
use std::fmt;

use crate::config;
use crate::frame::{self, find_boundary};

/// Opaque frame identifier: the instruction pointer of one stack frame.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Frame(usize);

impl Frame {
    /// Raw instruction pointer.
    #[inline]
    pub const fn ip(&self) -> usize {
        self.0
    }

    /// Resolve this frame to function, file and line.
    ///
    /// When the address covers inlined calls, the outermost symbol wins: that
    /// is the function owning the physical frame. Frames without debug info
    /// resolve to `"unknown"` with an empty file.
    pub fn resolve(&self) -> FrameInfo {
        let mut info = FrameInfo::unknown();
        backtrace::resolve(self.0 as *mut c_void, |symbol| {
            info = FrameInfo {
                function: symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_else(|| FrameInfo::UNKNOWN.to_string()),
                file: symbol
                    .filename()
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                line: symbol.lineno().unwrap_or(0),
            };
        });
        info
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#x})", self.0)
    }
}

/// A resolved frame: `(function, file, line)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl FrameInfo {
    const UNKNOWN: &'static str = "unknown";

    fn unknown() -> Self {
        Self {
            function: Self::UNKNOWN.to_string(),
            file: String::new(),
            line: 0,
        }
    }
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\t{}:{}", self.function, self.file, self.line)
    }
}

/// Ordered frame identifiers, innermost (the caller) first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    /// Capture up to `depth` frames starting at the first caller frame.
    ///
    /// `requested_skip` frames are dropped before the boundary scan begins.
    /// `depth <= 0` is treated as 1. When capture is disabled through
    /// `BASERR_CAPTURE=0` the stack is empty.
    #[inline(never)]
    pub fn capture(requested_skip: usize, depth: i32) -> Self {
        let depth = usize::try_from(depth).unwrap_or(0).max(1);
        let config = config::global();
        if !config.capture {
            return Self::default();
        }

        // Never pre-size from `depth`: the real stack is the bound.
        let limit = requested_skip
            .saturating_add(config.scan_limit)
            .saturating_add(depth);
        let mut ips = Vec::new();
        backtrace::trace(|frame| {
            ips.push(Frame(frame.ip() as usize));
            ips.len() < limit
        });

        let candidates = ips.get(requested_skip..).unwrap_or_default();
        let root = frame::library_root();
        let boundary = find_boundary(
            candidates.iter().map(|f| root.classify(&f.resolve())),
            config.scan_limit,
        );

        if boundary.found {
            tracing::trace!(boundary = boundary.index, depth, "captured caller stack");
        } else {
            tracing::debug!(
                last_examined = boundary.index,
                scanned = candidates.len().min(config.scan_limit),
                "no caller frame found, keeping partial stack"
            );
        }

        Self {
            frames: candidates
                .iter()
                .skip(boundary.index)
                .take(depth)
                .copied()
                .collect(),
        }
    }

    /// Build a stack from already captured frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolve every frame into a structured trace.
    pub fn trace(&self) -> Vec<FrameInfo> {
        self.frames.iter().map(Frame::resolve).collect()
    }
}

/// Renders each frame as `\n<function>\n\t<file>:<line>`, ready to be
/// appended after an error's short form.
impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            write!(f, "\n{}", frame.resolve())?;
        }
        Ok(())
    }
}
