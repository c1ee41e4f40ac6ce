use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};
use std::str;
use bytecodec::bytes::BytesEncoder;
use bytecodec::{ByteCount, Decode, Encode, Eos, Error, ErrorKind, Result, SizedEncode};

use {DecodeOptions, HttpVersion, StartLine, Uri};
use method::MethodDecoder;
use uri::UriDecoder;
use util::{self, CrlfDecoder};
use version::HttpVersionDecoder;

/// Request-line of an HTTP request message ([RFC 7230#3.1.1]).
///
/// Two request-lines are equal if they have the same method, target and HTTP version.
/// The target form is not taken into account,
/// so equal request-lines may be serialized to different bytes.
///
/// [RFC 7230#3.1.1]: https://tools.ietf.org/html/rfc7230#section-3.1.1
#[derive(Debug, Clone)]
pub struct RequestLine {
    method: String,
    target: Uri,
    http_version: HttpVersion,
    absolute_form: bool,
}
impl RequestLine {
    /// Makes a new `RequestLine` instance whose target is written in origin-form.
    ///
    /// `method` is not validated.
    /// Use `Method::new` beforehand if it comes from an untrusted source.
    pub fn new<M: Into<String>>(method: M, target: Uri, http_version: HttpVersion) -> Self {
        Self::with_target_form(method, target, http_version, false)
    }

    /// Makes a new `RequestLine` instance.
    ///
    /// If `absolute_form` is `true`, the target is written in absolute-form
    /// (i.e., `scheme ":" scheme-specific-part`), otherwise in origin-form.
    pub fn with_target_form<M: Into<String>>(
        method: M,
        target: Uri,
        http_version: HttpVersion,
        absolute_form: bool,
    ) -> Self {
        RequestLine {
            method: method.into(),
            target,
            http_version,
            absolute_form,
        }
    }

    /// Returns the method name of the request.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the target URI of the request.
    pub fn target(&self) -> &Uri {
        &self.target
    }

    /// Returns the HTTP version of the request.
    pub fn http_version(&self) -> HttpVersion {
        self.http_version
    }

    /// Returns `true` if the target is written in absolute-form.
    pub fn is_absolute_form(&self) -> bool {
        self.absolute_form
    }

    /// Makes a copy of this request-line whose target host is replaced by `host`.
    ///
    /// `host` may include a port using the `"host:port"` syntax.
    /// The port of the current target is never kept,
    /// even if `host` has no port.
    ///
    /// # Errors
    ///
    /// If `host` is malformed or the target has a rootless path (e.g., `"urn:isbn:1"`),
    /// an `ErrorKind::InvalidInput` error will be returned.
    pub fn with_host(&self, host: &str) -> Result<Self> {
        let target = track!(self.target.with_host(host); host)?;
        trace!(
            "Request-line host replaced: {:?} -> {:?}",
            self.target.authority().map(|a| a.to_string()),
            host
        );
        Ok(RequestLine {
            method: self.method.clone(),
            target,
            http_version: self.http_version,
            absolute_form: self.absolute_form,
        })
    }

    /// Writes the request-line, including the trailing CRLF, to `writer`.
    ///
    /// # Errors
    ///
    /// Failures reported by `writer` are returned as is.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        track!(self.write_line(writer, true).map_err(Error::from))
    }

    /// Returns the wire bytes of the request-line, including the trailing CRLF.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        self.write_line(&mut buf, true).expect("Never fails");
        buf
    }

    fn write_line<W: Write>(&self, mut writer: W, crlf: bool) -> io::Result<()> {
        util::write_ascii(&mut writer, &self.method)?;
        writer.write_all(b" ")?;
        if self.absolute_form {
            if let Some(scheme) = self.target.scheme() {
                util::write_ascii(&mut writer, scheme)?;
                writer.write_all(b":")?;
            }
            util::write_ascii(&mut writer, &self.target.scheme_specific_part())?;
        } else {
            let path = self.target.raw_path();
            if path.is_empty() {
                writer.write_all(b"/")?;
            } else {
                util::write_ascii(&mut writer, path)?;
            }
            match self.target.raw_query() {
                Some(query) if !query.is_empty() => {
                    writer.write_all(b"?")?;
                    util::write_ascii(&mut writer, query)?;
                }
                _ => {}
            }
        }
        writer.write_all(b" ")?;
        writer.write_all(self.http_version.as_ref())?;
        if crlf {
            writer.write_all(b"\r\n")?;
        }
        Ok(())
    }
}
impl StartLine for RequestLine {
    fn http_version(&self) -> HttpVersion {
        self.http_version
    }

    fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        track!(RequestLine::write_to(self, writer))
    }
}
impl PartialEq for RequestLine {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.target == other.target
            && self.http_version == other.http_version
    }
}
impl Eq for RequestLine {}
impl Hash for RequestLine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.hash(state);
        self.target.hash(state);
        self.http_version.hash(state);
    }
}
impl fmt::Display for RequestLine {
    /// Formats the request-line without the trailing CRLF.
    ///
    /// This is meant for diagnostics, use `write_to` to put the line on the wire.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = Vec::with_capacity(256);
        self.write_line(&mut buf, false).expect("Never fails");
        f.write_str(str::from_utf8(&buf).expect("Never fails"))
    }
}

/// Request-line encoder.
#[derive(Debug, Default)]
pub struct RequestLineEncoder(BytesEncoder<Vec<u8>>);
impl RequestLineEncoder {
    /// Makes a new `RequestLineEncoder` instance.
    pub fn new() -> Self {
        Self::default()
    }
}
impl Encode for RequestLineEncoder {
    type Item = RequestLine;

    fn encode(&mut self, buf: &mut [u8], eos: Eos) -> Result<usize> {
        track!(self.0.encode(buf, eos))
    }

    fn start_encoding(&mut self, item: Self::Item) -> Result<()> {
        track!(self.0.start_encoding(item.to_bytes()))
    }

    fn is_idle(&self) -> bool {
        self.0.is_idle()
    }

    fn requiring_bytes(&self) -> ByteCount {
        self.0.requiring_bytes()
    }
}
impl SizedEncode for RequestLineEncoder {
    fn exact_requiring_bytes(&self) -> u64 {
        self.0.exact_requiring_bytes()
    }
}

/// Request-line decoder.
///
/// The method token and the target characters are validated,
/// and the target is parsed into an `Uri`.
/// A target that has a scheme or an authority is kept in absolute-form.
#[derive(Debug, Default)]
pub struct RequestLineDecoder {
    method: MethodDecoder,
    target: UriDecoder,
    http_version: HttpVersionDecoder,
    crlf: CrlfDecoder,
    size: usize,
    options: DecodeOptions,
}
impl RequestLineDecoder {
    /// Makes a new `RequestLineDecoder` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a new `RequestLineDecoder` instance with the given options.
    pub fn with_options(options: DecodeOptions) -> Self {
        RequestLineDecoder {
            options,
            ..Self::default()
        }
    }

    fn decode_parts(&mut self, buf: &[u8], eos: Eos) -> Result<usize> {
        let mut offset = 0;
        if !self.method.is_idle() {
            offset += track!(self.method.decode(buf, eos))?;
            if !self.method.is_idle() {
                return Ok(offset);
            }
        }
        if !self.target.is_idle() {
            offset += track!(self.target.decode(&buf[offset..], eos))?;
            if !self.target.is_idle() {
                return Ok(offset);
            }
        }
        if !self.http_version.is_idle() {
            offset += track!(self.http_version.decode(&buf[offset..], eos))?;
            if !self.http_version.is_idle() {
                return Ok(offset);
            }
        }
        offset += track!(self.crlf.decode(&buf[offset..], eos))?;
        Ok(offset)
    }
}
impl Decode for RequestLineDecoder {
    type Item = RequestLine;

    fn decode(&mut self, buf: &[u8], eos: Eos) -> Result<usize> {
        let size = track!(self.decode_parts(buf, eos))?;
        self.size += size;
        track_assert!(
            self.size <= self.options.max_start_line_size,
            ErrorKind::InvalidInput,
            "Too long request-line: size={}, max={}",
            self.size,
            self.options.max_start_line_size
        );
        Ok(size)
    }

    fn finish_decoding(&mut self) -> Result<Self::Item> {
        self.size = 0;
        let method = track!(self.method.finish_decoding())?;
        let target = track!(self.target.finish_decoding())?;
        let http_version = track!(self.http_version.finish_decoding())?;
        track!(self.crlf.finish_decoding())?;

        let absolute_form = target.scheme().is_some() || target.authority().is_some();
        let line = RequestLine::with_target_form(method, target, http_version, absolute_form);
        debug!("Request-line decoded: {}", line);
        Ok(line)
    }

    fn requiring_bytes(&self) -> ByteCount {
        if self.http_version.is_idle() {
            self.crlf.requiring_bytes()
        } else if self.target.is_idle() {
            self.http_version
                .requiring_bytes()
                .add_for_decoding(self.crlf.requiring_bytes())
        } else {
            ByteCount::Unknown
        }
    }

    fn is_idle(&self) -> bool {
        self.crlf.is_idle()
    }
}
