use std;
use std::io::{self, Write};
use bytecodec::bytes::CopyableBytesDecoder;
use bytecodec::{ByteCount, Decode, Eos, Error, ErrorKind, Result};
use trackable::error::ErrorKindExt;

#[derive(Debug, Default)]
pub struct CrlfDecoder(CopyableBytesDecoder<[u8; 2]>);
impl Decode for CrlfDecoder {
    type Item = ();

    fn decode(&mut self, buf: &[u8], eos: Eos) -> Result<usize> {
        track!(self.0.decode(buf, eos))
    }

    fn finish_decoding(&mut self) -> Result<Self::Item> {
        let b = track!(self.0.finish_decoding())?;
        track_assert_eq!(b, [b'\r', b'\n'], ErrorKind::InvalidInput);
        Ok(())
    }

    fn requiring_bytes(&self) -> ByteCount {
        self.0.requiring_bytes()
    }

    fn is_idle(&self) -> bool {
        self.0.is_idle()
    }
}

/// Writes `s` as US-ASCII; characters outside of the charset become `?`.
pub fn write_ascii<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    if s.is_ascii() {
        return writer.write_all(s.as_bytes());
    }
    let bytes = s.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect::<Vec<_>>();
    writer.write_all(&bytes)
}

// https://tools.ietf.org/html/rfc7230#section-3.2.6
pub fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

// https://tools.ietf.org/html/rfc5234#appendix-B.1
pub fn is_vchar(b: u8) -> bool {
    b.is_ascii_graphic()
}

pub fn into_invalid_input<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
    ErrorKind::InvalidInput.cause(e).into()
}
