use std::fmt;
use bytecodec::bytes::CopyableBytesDecoder;
use bytecodec::{ByteCount, Decode, Eos, ErrorKind, Result};

/// HTTP version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    V1_0,
    V1_1,
}
impl HttpVersion {
    /// Returns the string representation of the version (e.g., `"HTTP/1.1"`).
    pub fn as_str(&self) -> &'static str {
        match *self {
            HttpVersion::V1_0 => "HTTP/1.0",
            HttpVersion::V1_1 => "HTTP/1.1",
        }
    }
}
impl AsRef<[u8]> for HttpVersion {
    fn as_ref(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}
impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes an `HTTP/1.0` or `HTTP/1.1` token.
#[derive(Debug, Default)]
pub struct HttpVersionDecoder(CopyableBytesDecoder<[u8; 8]>);
impl Decode for HttpVersionDecoder {
    type Item = HttpVersion;

    fn decode(&mut self, buf: &[u8], eos: Eos) -> Result<usize> {
        track!(self.0.decode(buf, eos))
    }

    fn finish_decoding(&mut self) -> Result<Self::Item> {
        let v = track!(self.0.finish_decoding())?;
        match &v {
            b"HTTP/1.0" => Ok(HttpVersion::V1_0),
            b"HTTP/1.1" => Ok(HttpVersion::V1_1),
            _ => track_panic!(
                ErrorKind::InvalidInput,
                "Unknown HTTP version: {:?}",
                String::from_utf8_lossy(&v[..])
            ),
        }
    }

    fn requiring_bytes(&self) -> ByteCount {
        self.0.requiring_bytes()
    }

    fn is_idle(&self) -> bool {
        self.0.is_idle()
    }
}
