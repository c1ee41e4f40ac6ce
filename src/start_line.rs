use std::io::Write;

use {HttpVersion, Result};

/// Start-line of an HTTP message.
pub trait StartLine {
    /// Returns the HTTP version of the message.
    fn http_version(&self) -> HttpVersion;

    /// Writes the start-line, including the trailing CRLF, to `writer`.
    ///
    /// # Errors
    ///
    /// Failures reported by `writer` are returned as is.
    fn write_to<W: Write>(&self, writer: W) -> Result<()>;
}
