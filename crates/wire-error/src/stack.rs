//! Call-stack capture for freshly built errors.
//!
//! The trace is taken from [`std::backtrace`], parsed back into frames and
//! reduced to what an operator needs: frames from this crate and from the
//! Rust standard library are dropped, vendored paths collapse to
//! `/vendor/<rest>`, and well-known hosting prefixes (plus cargo's per-host
//! `<name>-<hash>` checkout directory) are cut off so traces look the same on
//! every machine.
//!
//! ```text
//! billing/src/invoice.rs:88
//! /vendor/tonic/src/server/grpc.rs:412
//! acme/gateway/src/router.rs:57
//! ```
//!
//! Line numbers are call-site lines: std symbolizes each return address at
//! `ip - 1`, so the reported line is the one holding the call.

use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// How many frames a single capture inspects after skipping.
pub const DEFAULT_MAX_FRAMES: usize = 20;

// Every capture goes through `capture_frames`; frames up to and including it
// belong to the backtrace machinery. Optimized builds render it as the bare
// name, debug builds with its module path.
const ANCHOR_NAME: &str = "capture_frames";

static ACTIVE_FILTER: OnceLock<StackFilter> = OnceLock::new();

/// One resolved stack frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub symbol: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(symbol: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            symbol: symbol.into(),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// A frame the symbolizer could not place in a source file.
    pub fn unresolved(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            file: None,
            line: None,
        }
    }
}

/// Which frames survive a capture and how their paths are shortened.
///
/// Deserializable with every field optional, so a host application can keep
/// it in its own config file:
///
/// ```toml
/// max_frames = 12
/// host_prefixes = ["/github.com/", "/git.example.net/"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackFilter {
    pub max_frames: usize,
    /// Substrings marking frames inside this crate.
    pub internal_markers: Vec<String>,
    /// Substrings marking frames inside the Rust standard library.
    pub system_markers: Vec<String>,
    pub vendor_marker: String,
    /// Cut, in order, from every non-vendored path up to and including the
    /// first occurrence.
    pub host_prefixes: Vec<String>,
}

impl Default for StackFilter {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            internal_markers: vec![
                concat!(env!("CARGO_MANIFEST_DIR"), "/src/").replace('\\', "/"),
            ],
            system_markers: vec!["/rustc/".into(), "/rustlib/src/rust/library/".into()],
            vendor_marker: "/vendor/".into(),
            host_prefixes: vec![
                "/github.com/".into(),
                "/gitlab.com/".into(),
                "/bitbucket.org/".into(),
                "/.cargo/registry/src/".into(),
                "/.cargo/git/checkouts/".into(),
            ],
        }
    }
}

impl StackFilter {
    /// Capture the current stack. `skip` counts frames above the caller of
    /// this method; with `skip == 0` the caller is the first candidate frame.
    #[inline(never)]
    pub fn capture(&self, skip: usize) -> String {
        let frames = capture_frames();
        self.render(&self.window(frames, skip + 1))
    }

    /// Frames above the capture anchor, minus `skip`, at most `max_frames`.
    fn window(&self, frames: Vec<Frame>, skip: usize) -> Vec<Frame> {
        let anchor = frames
            .iter()
            .position(|f| is_anchor(&f.symbol))
            // Symbols stripped: the first frame past std is `capture_frames`.
            .or_else(|| {
                frames
                    .iter()
                    .position(|f| !f.file.as_deref().is_some_and(|p| self.is_system(p)))
            });
        let start = anchor.map_or(frames.len(), |anchor| anchor + 1);
        frames
            .into_iter()
            .skip(start.saturating_add(skip))
            .take(self.max_frames)
            .collect()
    }

    /// Render surviving frames as `path:line` lines, innermost first.
    pub fn render(&self, frames: &[Frame]) -> String {
        let mut out = String::new();
        for frame in frames {
            let (Some(file), Some(line)) = (frame.file.as_deref(), frame.line) else {
                continue;
            };
            let Some(path) = self.shorten(file) else {
                continue;
            };
            out.push_str(&path);
            out.push(':');
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    /// Shortened form of `path`, or `None` when the frame should be dropped.
    pub fn shorten(&self, path: &str) -> Option<String> {
        if self.is_internal(path) || self.is_system(path) {
            return None;
        }

        let path = trim_to_marker(path, &self.vendor_marker);
        if !self.vendor_marker.is_empty() && path.starts_with(self.vendor_marker.as_str()) {
            return Some(path.to_string());
        }

        let path = self
            .host_prefixes
            .iter()
            .fold(path, |path, prefix| trim_through_marker(path, prefix));
        Some(trim_checkout_dir(path).to_string())
    }

    pub fn is_internal(&self, path: &str) -> bool {
        contains_any(path, &self.internal_markers)
    }

    pub fn is_system(&self, path: &str) -> bool {
        contains_any(path, &self.system_markers)
    }
}

/// Install the process-wide filter used by [`capture_stack`].
///
/// Only the first call wins; later calls get their filter handed back.
pub fn install_stack_filter(filter: StackFilter) -> Result<(), StackFilter> {
    ACTIVE_FILTER.set(filter)
}

pub fn active_stack_filter() -> &'static StackFilter {
    ACTIVE_FILTER.get_or_init(StackFilter::default)
}

/// Capture the current stack with the active filter, `skip` frames above the
/// caller of this function.
#[inline(never)]
pub fn capture_stack(skip: usize) -> String {
    active_stack_filter().capture(skip + 1)
}

#[inline(never)]
fn capture_frames() -> Vec<Frame> {
    parse_backtrace(&Backtrace::force_capture().to_string())
}

/// Parse the rendering of a [`std::backtrace::Backtrace`]:
///
/// ```text
///    4: billing::invoice::send
///              at ./src/invoice.rs:88:17
/// ```
///
/// Unnumbered symbol lines (inlined functions, in renderings that list them
/// under their physical frame) become frames of their own. Frames without an
/// `at` line keep `file` and `line` unset.
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let cwd = std::env::current_dir().ok();
    let mut frames: Vec<Frame> = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(location) = line.strip_prefix("at ") {
            let Some(frame) = frames.last_mut() else {
                continue;
            };
            if frame.file.is_some() {
                continue;
            }
            if let Some((file, lineno)) = split_location(location) {
                frame.file = Some(normalise_path(file, cwd.as_ref()));
                frame.line = Some(lineno);
            }
        } else if let Some(symbol) = numbered_symbol(line) {
            frames.push(Frame::unresolved(symbol));
        } else if !line.is_empty() {
            frames.push(Frame::unresolved(line));
        }
    }
    frames
}

/// `symbol` out of `12: symbol`.
fn numbered_symbol(line: &str) -> Option<&str> {
    let (index, symbol) = line.split_once(": ")?;
    (!index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())).then_some(symbol)
}

/// `path:line:column` or `path:line`.
fn split_location(location: &str) -> Option<(&str, u32)> {
    let (rest, last) = location.rsplit_once(':')?;
    let last: u32 = last.parse().ok()?;
    if let Some((path, line)) = rest.rsplit_once(':') {
        if let Ok(line) = line.parse::<u32>() {
            return Some((path, line));
        }
    }
    Some((rest, last))
}

fn normalise_path(path: &str, cwd: Option<&PathBuf>) -> String {
    let path = path.replace('\\', "/");
    match (path.strip_prefix("./"), cwd) {
        (Some(relative), Some(cwd)) => cwd.join(relative).to_string_lossy().replace('\\', "/"),
        _ => path,
    }
}

fn contains_any(path: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|marker| !marker.is_empty() && path.contains(marker.as_str()))
}

/// `capture_frames`, as `wire_error::stack::capture_frames` or bare, with or
/// without the trailing `::h<hash>` of a raw symbol.
fn is_anchor(symbol: &str) -> bool {
    let symbol = match symbol.rsplit_once("::h") {
        Some((head, hash)) if is_hash(hash) => head,
        _ => symbol,
    };
    symbol == ANCHOR_NAME
        || symbol
            .strip_suffix(ANCHOR_NAME)
            .is_some_and(|head| head.ends_with("::"))
}

fn is_hash(text: &str) -> bool {
    text.len() == 16 && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Drop a leading `<name>-<hash>/` component, the per-host directory cargo
/// keeps registry sources and git checkouts under
/// (`index.crates.io-6f17d22bba15001f/tokio-1.40.0/..`).
fn trim_checkout_dir(path: &str) -> &str {
    match path.split_once('/') {
        Some((dir, rest))
            if dir
                .rsplit_once('-')
                .is_some_and(|(name, hash)| !name.is_empty() && is_hash(hash)) =>
        {
            rest
        }
        _ => path,
    }
}

/// Drop everything before the first `marker`, keeping the marker.
fn trim_to_marker<'a>(path: &'a str, marker: &str) -> &'a str {
    path.find(marker).map_or(path, |at| &path[at..])
}

/// Drop everything up to and including the first `marker`.
fn trim_through_marker<'a>(path: &'a str, marker: &str) -> &'a str {
    path.find(marker).map_or(path, |at| &path[at + marker.len()..])
}
