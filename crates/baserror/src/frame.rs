//! Frame classification: which captured frames belong to this library.
//!
//! The library root is derived once per process from the location of this
//! very file. Two levels up from the file is the crate directory; if the
//! crate directory sits inside a package host directory (a cargo registry
//! index such as `index.crates.io-6f17d22bba15001f`, the older
//! `github.com-1ecc6299db9ec823`, or a `git/checkouts/<repo>-<hash>`
//! directory), the host directory is the root instead.
//!
//! ```text
//! <host>/baserror-0.1.0/src/frame.rs   → root = <host>/
//! <workspace>/crates/baserror/src/frame.rs → root = <workspace>/crates/baserror/
//! ```
//!
//! A frame is a *library frame* when its file lives under the root and it is
//! not a test-harness frame. Test frames always count as callers, so a test
//! that exercises the library sees itself at the top of the captured stack.

use std::path::Path;
use std::sync::OnceLock;

use crate::stack::FrameInfo;

/// Directory names that mark a package host (module cache) directory.
const PACKAGE_HOSTS: &[&str] = &["github.com", "index.crates.io"];

/// Absolute location of this file at compile time.
const SOURCE_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/frame.rs");

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        fn normalize(path: &str) -> String {
            path.replace('\\', "/")
        }
    } else {
        fn normalize(path: &str) -> String {
            path.to_owned()
        }
    }
}

/// Parent directory of cargo git checkouts (`~/.cargo/git/checkouts`).
const GIT_CHECKOUTS: &str = "checkouts";

/// A `<repo>-<hash>` directory directly inside the git checkouts dir.
fn is_git_checkout(dir: &Path) -> bool {
    dir.parent()
        .and_then(Path::file_name)
        .is_some_and(|name| name == GIT_CHECKOUTS)
}

fn is_package_host(segment: &str) -> bool {
    PACKAGE_HOSTS.iter().any(|host| {
        segment == *host
            || segment
                .strip_prefix(host)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

/// Compute the library root for a source file path.
///
/// Returns a `/`-separated prefix ending in `/`, or an empty string when
/// the path is too shallow to have a crate directory.
pub fn source_root(file: &str) -> String {
    let file = normalize(file);
    let crate_dir = Path::new(&file)
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));

    let root = match crate_dir.parent() {
        Some(host)
            if is_git_checkout(host)
                || host
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(is_package_host) =>
        {
            host
        }
        _ => crate_dir,
    };

    let mut root = normalize(&root.to_string_lossy());
    if !root.is_empty() && !root.ends_with('/') {
        root.push('/');
    }
    root
}

/// Is this frame part of a test harness?
///
/// `relative` is the frame's file path below the library root. Files under
/// `tests/` or `benches/`, files named `tests.rs` / `*_test.rs` /
/// `*_tests.rs`, and functions inside a `tests` module all qualify.
pub fn is_test_frame(relative: &str, function: Option<&str>) -> bool {
    let relative = normalize(relative);
    let mut segments = relative.rsplit('/');
    let name = segments.next().unwrap_or("");

    let in_test_dir = segments.any(|dir| dir == "tests" || dir == "benches");
    let test_file =
        name == "tests.rs" || name.ends_with("_test.rs") || name.ends_with("_tests.rs");
    let test_fn = function.is_some_and(|f| f.split("::").any(|seg| seg == "tests"));

    in_test_dir || test_file || test_fn
}

/// How a single frame relates to the library boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Inside the library's own source tree.
    Library,
    /// Outside the library, or a test frame.
    Caller,
    /// No file information (missing debug info); never a boundary.
    Unresolved,
}

/// Canonical library root prefixes, computed once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoot {
    prefixes: Vec<String>,
}

impl LibraryRoot {
    /// Build a root from one or more source file locations.
    ///
    /// Debug info may report either the absolute path or the path the
    /// compiler was invoked with, so each location contributes a prefix.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes: Vec<String> = Vec::new();
        for source in sources {
            let root = source_root(source.as_ref());
            if !root.is_empty() && !prefixes.contains(&root) {
                prefixes.push(root);
            }
        }
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// True if `file` lives under the root and is not a test frame.
    pub fn is_library_frame(&self, file: &str, function: Option<&str>) -> bool {
        let file = normalize(file);
        self.prefixes.iter().any(|prefix| {
            file.strip_prefix(prefix.as_str())
                .is_some_and(|rest| !is_test_frame(rest, function))
        })
    }

    /// Classify a resolved frame.
    pub fn classify(&self, frame: &FrameInfo) -> FrameKind {
        if frame.file.is_empty() {
            FrameKind::Unresolved
        } else if self.is_library_frame(&frame.file, Some(&frame.function)) {
            FrameKind::Library
        } else {
            FrameKind::Caller
        }
    }
}

static ROOT: OnceLock<LibraryRoot> = OnceLock::new();

/// The process-wide library root.
pub fn library_root() -> &'static LibraryRoot {
    ROOT.get_or_init(|| LibraryRoot::from_sources([SOURCE_FILE, file!()]))
}

/// Result of the boundary scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// Index of the first caller frame, or the last examined position.
    pub index: usize,
    /// False when the scan ran out before finding a caller frame.
    pub found: bool,
}

/// Locate the first caller frame.
///
/// Frames before the first library frame belong to the stack walker and
/// are passed over. After that, the first `Caller` frame is the boundary.
/// At most `scan_limit` frames are examined; if no boundary turns up the
/// last examined position is used.
pub fn find_boundary<I>(kinds: I, scan_limit: usize) -> Boundary
where
    I: IntoIterator<Item = FrameKind>,
{
    let mut seen_library = false;
    let mut last = 0;

    for (index, kind) in kinds.into_iter().take(scan_limit).enumerate() {
        last = index;
        match kind {
            FrameKind::Library => seen_library = true,
            FrameKind::Caller if seen_library => return Boundary { index, found: true },
            FrameKind::Caller | FrameKind::Unresolved => {}
        }
    }

    Boundary { index: last, found: false }
}
