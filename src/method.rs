use std::fmt;
use std::mem;
use bytecodec::{ByteCount, Decode, Eos, ErrorKind, Result};

use util;

/// Request method name.
///
/// `RequestLine` accepts any method string as is;
/// use this type when the name must be checked before building a request-line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method<'a>(&'a str);
impl<'a> Method<'a> {
    /// Makes a new `Method` instance.
    ///
    /// # Errors
    ///
    /// `method` must be a non-empty "token" that defined in [RFC 7230#3.2.6].
    /// Otherwise it will return an `ErrorKind::InvalidInput` error.
    ///
    /// [RFC 7230#3.2.6]: https://tools.ietf.org/html/rfc7230#section-3.2.6
    pub fn new(method: &'a str) -> Result<Self> {
        track_assert!(!method.is_empty(), ErrorKind::InvalidInput, "Empty method");
        track_assert!(
            method.bytes().all(util::is_tchar),
            ErrorKind::InvalidInput,
            "Not a token: {:?}",
            method
        );
        Ok(Method(method))
    }

    /// Returns the method name.
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}
impl<'a> AsRef<str> for Method<'a> {
    fn as_ref(&self) -> &str {
        self.0
    }
}
impl<'a> fmt::Display for Method<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Decodes a method token and the single space that follows it.
#[derive(Debug, Default)]
pub struct MethodDecoder {
    buf: Vec<u8>,
    idle: bool,
}
impl Decode for MethodDecoder {
    type Item = String;

    fn decode(&mut self, buf: &[u8], eos: Eos) -> Result<usize> {
        if self.idle {
            return Ok(0);
        }
        if let Some(n) = buf.iter().position(|b| !util::is_tchar(*b)) {
            track_assert_eq!(buf[n] as char, ' ', ErrorKind::InvalidInput);
            self.buf.extend_from_slice(&buf[..n]);
            track_assert!(!self.buf.is_empty(), ErrorKind::InvalidInput, "Empty method");
            self.idle = true;
            Ok(n + 1)
        } else {
            track_assert!(!eos.is_reached(), ErrorKind::UnexpectedEos);
            self.buf.extend_from_slice(buf);
            Ok(buf.len())
        }
    }

    fn finish_decoding(&mut self) -> Result<Self::Item> {
        track_assert!(self.idle, ErrorKind::IncompleteDecoding);
        self.idle = false;
        let bytes = mem::replace(&mut self.buf, Vec::new());
        track!(String::from_utf8(bytes).map_err(util::into_invalid_input))
    }

    fn requiring_bytes(&self) -> ByteCount {
        if self.idle {
            ByteCount::Finite(0)
        } else {
            ByteCount::Unknown
        }
    }

    fn is_idle(&self) -> bool {
        self.idle
    }
}
