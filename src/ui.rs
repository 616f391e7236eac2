//! Tagged, colored terminal messages
//!
//! Every user-facing status line carries a tag such as `[INFO]` or `[GOOD]`
//! with its own color. Diagnostics go through `tracing` instead.
//!
//! When a command prints JSON, stdout belongs to the document and every
//! tagged line moves to stderr (see [`reserve_stdout`]).

use std::sync::atomic::{AtomicBool, Ordering};

use console::{style, Color, StyledObject};

static QUIET: AtomicBool = AtomicBool::new(false);
static STDOUT_RESERVED: AtomicBool = AtomicBool::new(false);

/// Kind of message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Progress information
    Info,
    /// Something went wrong
    Error,
    /// Waiting for user input
    Input,
    /// Echo of what the user answered
    Answer,
    /// A step finished successfully
    Good,
}

impl Tag {
    /// Bracketed label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "[INFO]",
            Self::Error => "[ERROR]",
            Self::Input => "[INPUT]",
            Self::Answer => "[ANS]",
            Self::Good => "[GOOD]",
        }
    }

    fn color(&self) -> Color {
        match self {
            Self::Info => Color::Green,
            Self::Error => Color::Red,
            Self::Input => Color::Blue,
            Self::Answer => Color::Magenta,
            // closest 256-color entry to rgb(255, 230, 0)
            Self::Good => Color::Color256(220),
        }
    }
}

/// Where a tagged line is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Drop `[INFO]` lines
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Keep stdout free for machine-readable output
pub fn reserve_stdout() {
    STDOUT_RESERVED.store(true, Ordering::Relaxed);
}

/// Whether stdout is reserved for machine-readable output
pub fn stdout_reserved() -> bool {
    STDOUT_RESERVED.load(Ordering::Relaxed)
}

/// Stream for `tag`, or `None` when the line is suppressed
pub fn route(tag: Tag, quiet: bool, stdout_reserved: bool) -> Option<Stream> {
    match tag {
        Tag::Info if quiet => None,
        Tag::Error => Some(Stream::Stderr),
        _ if stdout_reserved => Some(Stream::Stderr),
        _ => Some(Stream::Stdout),
    }
}

/// Plain text of a tagged line
pub fn format_line(tag: Tag, message: &str) -> String {
    format!("{} {}", tag.label(), message)
}

/// Styled tagged line
pub fn styled(tag: Tag, message: &str) -> StyledObject<String> {
    style(format_line(tag, message)).fg(tag.color()).bright()
}

/// Print a tagged line, errors to stderr
pub fn emit(tag: Tag, message: impl AsRef<str>) {
    let Some(stream) = route(tag, QUIET.load(Ordering::Relaxed), stdout_reserved()) else {
        return;
    };
    let line = styled(tag, message.as_ref());
    match stream {
        Stream::Stdout => println!("{}", line),
        Stream::Stderr => eprintln!("{}", line),
    }
}

/// Print an `[INFO]` line
pub fn info(message: impl AsRef<str>) {
    emit(Tag::Info, message);
}

/// Print an `[ERROR]` line
pub fn error(message: impl AsRef<str>) {
    emit(Tag::Error, message);
}

/// Print an `[INPUT]` line
pub fn input(message: impl AsRef<str>) {
    emit(Tag::Input, message);
}

/// Print an `[ANS]` line
pub fn answer(message: impl AsRef<str>) {
    emit(Tag::Answer, message);
}

/// Print a `[GOOD]` line
pub fn good(message: impl AsRef<str>) {
    emit(Tag::Good, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(format_line(Tag::Info, "Is Unix: true"), "[INFO] Is Unix: true");
        assert_eq!(format_line(Tag::Answer, "x"), "[ANS] x");
        assert_eq!(Tag::Good.label(), "[GOOD]");
    }

    #[test]
    fn test_route() {
        assert_eq!(route(Tag::Info, false, false), Some(Stream::Stdout));
        assert_eq!(route(Tag::Good, false, false), Some(Stream::Stdout));
        assert_eq!(route(Tag::Error, false, false), Some(Stream::Stderr));
    }

    #[test]
    fn test_route_quiet_drops_info_only() {
        assert_eq!(route(Tag::Info, true, false), None);
        assert_eq!(route(Tag::Good, true, false), Some(Stream::Stdout));
        assert_eq!(route(Tag::Error, true, true), Some(Stream::Stderr));
    }

    #[test]
    fn test_route_reserved_stdout() {
        for tag in [Tag::Info, Tag::Input, Tag::Answer, Tag::Good] {
            assert_eq!(route(tag, false, true), Some(Stream::Stderr));
        }
    }

    #[test]
    fn test_styled_keeps_text() {
        console::set_colors_enabled(false);
        assert_eq!(styled(Tag::Error, "boom").to_string(), "[ERROR] boom");
    }
}
