use std::io::{self, Write};

/// Line termination applied by text sinks after each rendered record.
///
/// Used by [`WriterSink`](crate::WriterSink) and by the file sink in
/// `logging-sink`. Formatters never emit the terminator themselves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// One record per line.
    #[default]
    WithNewline,
    /// Records are written back to back; the formatter controls separation.
    WithoutNewline,
}

impl LineMode {
    /// Reports whether a newline follows each record.
    #[must_use]
    pub const fn append_newline(self) -> bool {
        matches!(self, Self::WithNewline)
    }

    /// Returns the bytes written after each record.
    #[must_use]
    pub const fn terminator(self) -> &'static [u8] {
        match self {
            Self::WithNewline => b"\n",
            Self::WithoutNewline => b"",
        }
    }

    /// Writes `rendered` followed by this mode's terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::LineMode;
    ///
    /// let mut out = Vec::new();
    /// LineMode::WithNewline.write_line(&mut out, "loader: ready").unwrap();
    /// LineMode::WithoutNewline.write_line(&mut out, "tail").unwrap();
    /// assert_eq!(out, b"loader: ready\ntail");
    /// ```
    pub fn write_line<W: Write + ?Sized>(self, writer: &mut W, rendered: &str) -> io::Result<()> {
        writer.write_all(rendered.as_bytes())?;
        writer.write_all(self.terminator())
    }
}
