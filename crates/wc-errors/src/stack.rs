// SPDX-License-Identifier: MIT OR Apache-2.0
//! Program-counter based call stack capture.
//!
//! A [`StackTrace`] only records return addresses when it is captured;
//! symbol resolution happens lazily, when a [`Frame`] is rendered.

use serde::{Serialize, Serializer};
use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum number of frames recorded by [`StackTrace::capture`].
pub const MAX_DEPTH: usize = 32;

/// Frames belonging to the unwinder itself, walked before `capture` is seen.
const INTERNAL_SLACK: usize = 16;

const UNKNOWN: &str = "unknown";

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A single captured program location.
///
/// Only the program counter is stored. Function, file and line are resolved
/// on demand and degrade to `"unknown"` / `0` when symbols are unavailable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame(usize);

struct Location {
    function: String,
    file: Option<PathBuf>,
    line: u32,
}

impl Frame {
    /// Wrap a raw program counter. `0` never resolves.
    pub const fn from_pc(pc: usize) -> Self {
        Self(pc)
    }

    /// The raw program counter.
    pub const fn pc(&self) -> usize {
        self.0
    }

    fn resolve(&self) -> Option<Location> {
        if self.0 == 0 {
            return None;
        }
        let mut found = None;
        backtrace::resolve(self.0 as *mut c_void, |symbol| {
            if found.is_some() {
                return;
            }
            found = Some(Location {
                function: symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_else(|| UNKNOWN.to_owned()),
                file: symbol.filename().map(Path::to_path_buf),
                line: symbol.lineno().unwrap_or(0),
            });
        });
        found
    }

    /// Function, file and line from a single symbol lookup.
    pub fn info(&self) -> FrameInfo {
        match self.resolve() {
            None => FrameInfo {
                function: UNKNOWN.to_owned(),
                file: UNKNOWN.to_owned(),
                line: 0,
            },
            Some(loc) => FrameInfo {
                file: loc.path(),
                function: loc.function,
                line: loc.line,
            },
        }
    }

    /// Fully qualified function name, or `"unknown"`.
    pub fn function(&self) -> String {
        self.resolve()
            .map(|loc| loc.function)
            .unwrap_or_else(|| UNKNOWN.to_owned())
    }

    /// Full path of the source file, or `"unknown"`.
    pub fn file(&self) -> String {
        self.resolve()
            .and_then(|loc| loc.file)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| UNKNOWN.to_owned())
    }

    /// Source line, or `0`.
    pub fn line(&self) -> u32 {
        self.resolve().map_or(0, |loc| loc.line)
    }

    /// Single-line text form: `function path:line`, or `unknown`.
    pub fn to_text(&self) -> String {
        match self.resolve() {
            None => UNKNOWN.to_owned(),
            Some(loc) => format!("{} {}:{}", loc.function, loc.path(), loc.line),
        }
    }
}

/// Resolved location of a [`Frame`], see [`Frame::info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// Fully qualified function name, or `"unknown"`.
    pub function: String,
    /// Full path of the source file, or `"unknown"`.
    pub file: String,
    /// Source line, or `0`.
    pub line: u32,
}

impl Location {
    fn path(&self) -> String {
        self.file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| UNKNOWN.to_owned())
    }

    fn base_name(&self) -> String {
        self.file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN.to_owned())
    }
}

/// `{}` renders `file:line` (base name only); `{:#}` renders
/// `function\n\tpath:line`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.resolve(), f.alternate()) {
            (None, true) => f.write_str(UNKNOWN),
            (None, false) => write!(f, "{UNKNOWN}:0"),
            (Some(loc), true) => write!(f, "{}\n\t{}:{}", loc.function, loc.path(), loc.line),
            (Some(loc), false) => write!(f, "{}:{}", loc.base_name(), loc.line),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#x})", self.0)
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

// ---------------------------------------------------------------------------
// StackTrace
// ---------------------------------------------------------------------------

/// Ordered frames, innermost call first.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<Frame>,
}

impl StackTrace {
    /// Record the calling thread's stack.
    ///
    /// `skip == 0` makes the first frame the function that called `capture`;
    /// every increment drops one more caller. At most [`MAX_DEPTH`] frames
    /// are kept.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        let marker = Self::capture as fn(usize) -> Self as usize;
        let budget = MAX_DEPTH + skip + INTERNAL_SLACK;
        let mut raw: Vec<(usize, usize)> = Vec::with_capacity(budget);
        backtrace::trace(|frame| {
            raw.push((frame.ip() as usize, frame.symbol_address() as usize));
            raw.len() < budget
        });

        let start = first_caller(&raw, marker);
        let frames = raw
            .into_iter()
            .skip(start + skip)
            .take(MAX_DEPTH)
            .map(|(ip, _)| Frame(ip))
            .collect();
        Self { frames }
    }

    /// Build a trace from explicit frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// The captured frames, innermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Innermost frame: the location that created the trace.
    pub fn top(&self) -> Option<Frame> {
        self.frames.first().copied()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Index of the frame that called `capture` within `raw`, innermost first.
///
/// Unwinder frames sit above `capture`. Without symbol addresses the frame is
/// found by name, and as a last resort everything up to the outermost
/// `backtrace` frame is dropped.
fn first_caller(raw: &[(usize, usize)], marker: usize) -> usize {
    raw.iter()
        .position(|&(_, symbol)| symbol != 0 && symbol == marker)
        .or_else(|| {
            raw.iter()
                .rposition(|&(ip, _)| symbol_name_contains(ip, "StackTrace::capture"))
        })
        .or_else(|| {
            raw.iter()
                .rposition(|&(ip, _)| symbol_name_starts_with(ip, "backtrace::"))
        })
        .map_or(0, |i| i + 1)
}

/// Whether any symbol at `ip`, inlined ones included, satisfies `pred`.
fn any_symbol_name(ip: usize, pred: impl Fn(&str) -> bool) -> bool {
    let mut hit = false;
    backtrace::resolve(ip as *mut c_void, |symbol| {
        if let Some(name) = symbol.name() {
            hit |= pred(&format!("{name:#}"));
        }
    });
    hit
}

fn symbol_name_contains(ip: usize, needle: &str) -> bool {
    any_symbol_name(ip, |name| name.contains(needle))
}

fn symbol_name_starts_with(ip: usize, prefix: &str) -> bool {
    any_symbol_name(ip, |name| name.starts_with(prefix))
}

/// `{}` renders `[a.rs:1 b.rs:2]`; `{:#}` renders one verbose frame per line.
impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for (i, frame) in self.frames.iter().enumerate() {
                if i > 0 {
                    f.write_str("\n")?;
                }
                write!(f, "{frame:#}")?;
            }
            return Ok(());
        }
        f.write_str("[")?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.frames).finish()
    }
}

impl Serialize for StackTrace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.frames)
    }
}
