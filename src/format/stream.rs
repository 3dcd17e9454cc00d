//! Buffered output with line-wrap hints.
//!
//! Rendered values are collected in a [`PrintStream`]. When a line width is configured, the
//! printers mark good places to break a long line with [`PrintStream::wrap_here`]. When text
//! written after the latest hint runs past the width, a newline and the hinted indentation are
//! inserted at the hint, moving that text to the next line. Without a width, hints are ignored.
//!
//! # Example
//!
//! ```rust
//! use std::fmt::Write;
//! use valscope::PrintStream;
//!
//! let mut out = PrintStream::with_width(12);
//! out.write_str("{1, 2, ")?;
//! out.wrap_here(2);
//! out.write_str("300000}")?;
//! assert_eq!(out.as_str(), "{1, 2, \n  300000}");
//! # Ok::<(), std::fmt::Error>(())
//! ```

use std::{fmt, io};

use crate::Result;

/// A buffered sink for rendered text.
#[derive(Debug, Default, Clone)]
pub struct PrintStream {
    buffer: String,
    width: Option<usize>,
    column: usize,
    wrap: Option<WrapPoint>,
}

/// Byte offset into the buffer where a line may be broken.
#[derive(Debug, Clone, Copy)]
struct WrapPoint {
    offset: usize,
    indent: usize,
}

impl PrintStream {
    /// Creates a stream without a line width.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream that wraps at `width` columns where hinted.
    #[must_use]
    pub fn with_width(width: usize) -> Self {
        PrintStream {
            width: Some(width),
            ..Self::default()
        }
    }

    /// Marks the current position as a place where a line may be broken.
    ///
    /// If the text following this point overflows the line, it continues on a new line
    /// indented by `indent` spaces.
    pub fn wrap_here(&mut self, indent: usize) {
        if self.width.is_none() {
            return;
        }
        self.wrap = Some(WrapPoint {
            offset: self.buffer.len(),
            indent,
        });
    }

    /// Writes `count` spaces.
    pub fn print_spaces(&mut self, count: usize) {
        for _ in 0..count {
            self.put(' ');
        }
    }

    /// Returns everything written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consumes the stream and returns all rendered text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Writes all rendered text to `writer` and empties the stream.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if writing fails.
    pub fn write_to<W: io::Write>(&mut self, writer: &mut W) -> Result<()> {
        writer.write_all(self.buffer.as_bytes())?;
        writer.flush()?;
        self.buffer.clear();
        self.wrap = None;
        Ok(())
    }

    /// Returns the current output column.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    fn put(&mut self, ch: char) {
        self.buffer.push(ch);
        if ch == '\n' {
            self.column = 0;
            self.wrap = None;
            return;
        }
        self.column += 1;

        let Some(width) = self.width else {
            return;
        };
        if self.column <= width {
            return;
        }
        if let Some(wrap) = self.wrap.take() {
            let mut break_text = String::with_capacity(wrap.indent + 1);
            break_text.push('\n');
            break_text.extend(std::iter::repeat(' ').take(wrap.indent));
            self.buffer.insert_str(wrap.offset, &break_text);
            let held = self.buffer[wrap.offset + break_text.len()..].chars().count();
            self.column = wrap.indent + held;
        }
    }
}

impl fmt::Write for PrintStream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            self.put(ch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_passthrough_without_width() {
        let mut out = PrintStream::new();
        out.write_str("abc").unwrap();
        out.wrap_here(4);
        out.write_str("def").unwrap();
        assert_eq!(out.as_str(), "abcdef");
        assert_eq!(out.column(), 6);
    }

    #[test]
    fn test_wrap_at_hint() {
        let mut out = PrintStream::with_width(10);
        out.write_str("0123456").unwrap();
        out.wrap_here(2);
        out.write_str("789ab").unwrap();
        assert_eq!(out.into_string(), "0123456\n  789ab");
    }

    #[test]
    fn test_no_wrap_when_fitting() {
        let mut out = PrintStream::with_width(10);
        out.write_str("0123").unwrap();
        out.wrap_here(2);
        out.write_str("4567").unwrap();
        out.wrap_here(2);
        out.write_str("89").unwrap();
        assert_eq!(out.into_string(), "0123456789");
    }

    #[test]
    fn test_newline_resets_column() {
        let mut out = PrintStream::with_width(4);
        out.write_str("ab\n").unwrap();
        out.wrap_here(1);
        out.write_str("cd").unwrap();
        assert_eq!(out.column(), 2);
        assert_eq!(out.into_string(), "ab\ncd");
    }

    #[test]
    fn test_write_to() {
        let mut out = PrintStream::new();
        out.print_spaces(2);
        out.write_str("x").unwrap();
        let mut sink = Vec::new();
        out.write_to(&mut sink).unwrap();
        assert_eq!(sink, b"  x");
        assert_eq!(out.as_str(), "");
    }
}
