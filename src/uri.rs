use std::fmt;
use std::mem;
use std::str::FromStr;
use bytecodec::{ByteCount, Decode, Eos, Error, ErrorKind, Result};

use util;

/// Authority component of an URI ([RFC 3986#3.2]).
///
/// The text is kept as it was given, so an empty port (`"host:"`) or
/// a zero-padded port (`"host:0080"`) is re-emitted unchanged.
///
/// [RFC 3986#3.2]: https://tools.ietf.org/html/rfc3986#section-3.2
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority {
    raw: String,
    userinfo: Option<String>,
    host: String,
    port: Option<u16>,
}
impl Authority {
    /// Makes a new `Authority` instance from a `"host"` or `"host:port"` string.
    ///
    /// IPv6 literals must be enclosed in brackets (e.g., `"[::1]:8080"`).
    ///
    /// # Errors
    ///
    /// If the host is empty, is an unbracketed IPv6 address,
    /// or the port is not a decimal number in the `u16` range,
    /// an `ErrorKind::InvalidInput` error will be returned.
    pub fn new(host: &str) -> Result<Self> {
        let authority = track!(Self::parse(None, host))?;
        track_assert!(!authority.host.is_empty(), ErrorKind::InvalidInput, "Empty host");
        Ok(authority)
    }

    fn parse(userinfo: Option<String>, hostport: &str) -> Result<Self> {
        let port_delim = if hostport.starts_with('[') {
            let end = track_assert_some!(
                hostport.find(']'),
                ErrorKind::InvalidInput,
                "Unclosed IP literal: {:?}",
                hostport
            );
            let rest = &hostport[end + 1..];
            track_assert!(
                rest.is_empty() || rest.starts_with(':'),
                ErrorKind::InvalidInput,
                "Garbage after IP literal: {:?}",
                hostport
            );
            if rest.is_empty() {
                None
            } else {
                Some(end + 1)
            }
        } else {
            track_assert!(
                hostport.matches(':').count() <= 1,
                ErrorKind::InvalidInput,
                "IPv6 address must be enclosed in brackets: {:?}",
                hostport
            );
            hostport.find(':')
        };

        let (host, port) = if let Some(i) = port_delim {
            let port = &hostport[i + 1..];
            let port = if port.is_empty() {
                None
            } else {
                track_assert!(
                    port.bytes().all(|b| b.is_ascii_digit()),
                    ErrorKind::InvalidInput,
                    "Not a port number: {:?}",
                    port
                );
                Some(track!(port.parse::<u16>().map_err(util::into_invalid_input); port)?)
            };
            (&hostport[..i], port)
        } else {
            (hostport, None)
        };

        let raw = match userinfo {
            Some(ref userinfo) => format!("{}@{}", userinfo, hostport),
            None => hostport.to_owned(),
        };
        Ok(Authority {
            raw,
            userinfo,
            host: host.to_owned(),
            port,
        })
    }

    /// Returns the user information subcomponent if present.
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_ref().map(|s| s.as_str())
    }

    /// Returns the host subcomponent.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port subcomponent if present.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the authority exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}
impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// URI reference used as the target of a request ([RFC 3986#4.1]).
///
/// The components are kept in their raw (i.e., not percent-decoded) forms.
///
/// [RFC 3986#4.1]: https://tools.ietf.org/html/rfc3986#section-4.1
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: Option<String>,
    authority: Option<Authority>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}
impl Uri {
    /// Makes a new `Uri` instance by parsing the given string.
    ///
    /// # Errors
    ///
    /// `uri` must be composed of "VCHAR" characters that defined in [RFC 7230].
    /// If it contains any other characters or has a malformed authority,
    /// an `ErrorKind::InvalidInput` error will be returned.
    ///
    /// [RFC 7230]: https://tools.ietf.org/html/rfc7230
    pub fn new(uri: &str) -> Result<Self> {
        track_assert!(
            uri.bytes().all(util::is_vchar),
            ErrorKind::InvalidInput,
            "Invalid URI characters: {:?}",
            uri
        );

        let (rest, fragment) = split_off(uri, '#');
        let (rest, query) = split_off(rest, '?');

        let (scheme, rest) = match rest.find(':') {
            Some(i) if is_scheme(&rest[..i]) => (Some(rest[..i].to_owned()), &rest[i + 1..]),
            _ => (None, rest),
        };

        let (authority, path) = if rest.starts_with("//") {
            let rest = &rest[2..];
            let end = rest.find('/').unwrap_or_else(|| rest.len());
            let (userinfo, hostport) = match rest[..end].rfind('@') {
                Some(i) => (Some(rest[..i].to_owned()), &rest[i + 1..end]),
                None => (None, &rest[..end]),
            };
            let authority = track!(Authority::parse(userinfo, hostport))?;
            (Some(authority), &rest[end..])
        } else {
            (None, rest)
        };

        Ok(Uri {
            scheme,
            authority,
            path: path.to_owned(),
            query: query.map(|s| s.to_owned()),
            fragment: fragment.map(|s| s.to_owned()),
        })
    }

    /// Returns the scheme component if present.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_ref().map(|s| s.as_str())
    }

    /// Returns the authority component if present.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Returns the host of the authority component if present.
    pub fn host(&self) -> Option<&str> {
        self.authority.as_ref().map(|a| a.host())
    }

    /// Returns the port of the authority component if present.
    pub fn port(&self) -> Option<u16> {
        self.authority.as_ref().and_then(|a| a.port())
    }

    /// Returns the raw path component (may be empty).
    pub fn raw_path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query component if present.
    pub fn raw_query(&self) -> Option<&str> {
        self.query.as_ref().map(|s| s.as_str())
    }

    /// Returns the raw fragment component if present.
    pub fn raw_fragment(&self) -> Option<&str> {
        self.fragment.as_ref().map(|s| s.as_str())
    }

    /// Returns everything between the scheme delimiter and the fragment.
    ///
    /// That is `["//" authority] path ["?" query]`.
    pub fn scheme_specific_part(&self) -> String {
        let mut s = String::new();
        if let Some(ref authority) = self.authority {
            s.push_str("//");
            s.push_str(authority.as_str());
        }
        s.push_str(&self.path);
        if let Some(ref query) = self.query {
            s.push('?');
            s.push_str(query);
        }
        s
    }

    /// Makes a copy of this URI whose authority is replaced by `host`.
    ///
    /// `host` is either `"host"` or `"host:port"`.
    /// The port of the resulting URI comes only from `host`,
    /// so the port of this URI is dropped when `host` has none.
    /// The user information is kept.
    ///
    /// # Errors
    ///
    /// If `host` is malformed, or this URI has a rootless path (e.g., `"urn:isbn:1"`)
    /// that cannot follow an authority, an `ErrorKind::InvalidInput` error will be returned.
    pub fn with_host(&self, host: &str) -> Result<Self> {
        track_assert!(
            self.path.is_empty() || self.path.starts_with('/'),
            ErrorKind::InvalidInput,
            "Cannot add an authority to a rootless path: {:?}",
            self.path
        );
        let userinfo = self.authority
            .as_ref()
            .and_then(|a| a.userinfo.clone());
        let authority = track!(Authority::parse(userinfo, host))?;
        track_assert!(!authority.host.is_empty(), ErrorKind::InvalidInput, "Empty host");
        Ok(Uri {
            scheme: self.scheme.clone(),
            authority: Some(authority),
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        })
    }
}
impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        track!(Uri::new(s))
    }
}
impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref scheme) = self.scheme {
            write!(f, "{}:", scheme)?;
        }
        write!(f, "{}", self.scheme_specific_part())?;
        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

fn split_off(s: &str, delim: char) -> (&str, Option<&str>) {
    match s.find(delim) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    }
}

// https://tools.ietf.org/html/rfc3986#section-3.1
fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
}

/// Decodes a request-target and the single space that follows it.
#[derive(Debug, Default)]
pub struct UriDecoder {
    buf: Vec<u8>,
    idle: bool,
}
impl Decode for UriDecoder {
    type Item = Uri;

    fn decode(&mut self, buf: &[u8], eos: Eos) -> Result<usize> {
        if self.idle {
            return Ok(0);
        }
        if let Some(n) = buf.iter().position(|b| !util::is_vchar(*b)) {
            track_assert_eq!(buf[n] as char, ' ', ErrorKind::InvalidInput);
            self.buf.extend_from_slice(&buf[..n]);
            track_assert!(
                !self.buf.is_empty(),
                ErrorKind::InvalidInput,
                "Empty request-target"
            );
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
        let target = track!(String::from_utf8(bytes).map_err(util::into_invalid_input))?;
        track!(Uri::new(&target))
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

#[cfg(test)]
mod test {
    use bytecodec::io::IoDecodeExt;
    use bytecodec::ErrorKind;

    use super::*;

    #[test]
    fn origin_form_uri_works() {
        let uri = track_try_unwrap!(Uri::new("/a/b?x=1&y=2"));
        assert_eq!(uri.scheme(), None);
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.raw_path(), "/a/b");
        assert_eq!(uri.raw_query(), Some("x=1&y=2"));
        assert_eq!(uri.raw_fragment(), None);
        assert_eq!(uri.scheme_specific_part(), "/a/b?x=1&y=2");
        assert_eq!(uri.to_string(), "/a/b?x=1&y=2");

        let uri = track_try_unwrap!(Uri::new(""));
        assert_eq!(uri.raw_path(), "");
        assert_eq!(uri.raw_query(), None);

        let uri = track_try_unwrap!(Uri::new("/search?"));
        assert_eq!(uri.raw_path(), "/search");
        assert_eq!(uri.raw_query(), Some(""));
    }

    #[test]
    fn absolute_uri_works() {
        let uri = track_try_unwrap!(Uri::new("http://user@example.com:9090/a%20b?q=1#top"));
        assert_eq!(uri.scheme(), Some("http"));
        assert_eq!(uri.authority().and_then(|a| a.userinfo()), Some("user"));
        assert_eq!(uri.host(), Some("example.com"));
        assert_eq!(uri.port(), Some(9090));
        assert_eq!(uri.raw_path(), "/a%20b");
        assert_eq!(uri.raw_query(), Some("q=1"));
        assert_eq!(uri.raw_fragment(), Some("top"));
        assert_eq!(uri.scheme_specific_part(), "//user@example.com:9090/a%20b?q=1");
        assert_eq!(uri.to_string(), "http://user@example.com:9090/a%20b?q=1#top");

        let uri = track_try_unwrap!(Uri::new("http://[::1]:8080"));
        assert_eq!(uri.host(), Some("[::1]"));
        assert_eq!(uri.port(), Some(8080));
        assert_eq!(uri.raw_path(), "");

        let uri = track_try_unwrap!(Uri::new("file:///etc/hosts"));
        assert_eq!(uri.host(), Some(""));
        assert_eq!(uri.raw_path(), "/etc/hosts");
        assert_eq!(uri.to_string(), "file:///etc/hosts");

        let uri = track_try_unwrap!(Uri::new("urn:isbn:0451450523"));
        assert_eq!(uri.scheme(), Some("urn"));
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.scheme_specific_part(), "isbn:0451450523");
    }

    #[test]
    fn malformed_uri_is_rejected() {
        assert_eq!(
            Uri::new("/a b").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(
            Uri::new("http://example.com:http/").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(
            Uri::new("http://example.com:99999/").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(
            Uri::new("http://[::1/").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn with_host_works() {
        let uri = track_try_unwrap!(Uri::new("http://localhost:9090/hello?x=1"));

        let replaced = track_try_unwrap!(uri.with_host("example.com"));
        assert_eq!(replaced.host(), Some("example.com"));
        assert_eq!(replaced.port(), None);
        assert_eq!(replaced.to_string(), "http://example.com/hello?x=1");

        let replaced = track_try_unwrap!(uri.with_host("example.com:80"));
        assert_eq!(replaced.port(), Some(80));
        assert_eq!(replaced.to_string(), "http://example.com:80/hello?x=1");

        let replaced = track_try_unwrap!(uri.with_host("[::1]:8443"));
        assert_eq!(replaced.host(), Some("[::1]"));
        assert_eq!(replaced.port(), Some(8443));

        assert_eq!(uri.port(), Some(9090));
        assert_eq!(
            uri.with_host("").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(
            uri.with_host("example.com:port").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn authority_text_is_kept_as_is() {
        let uri = track_try_unwrap!(Uri::new("http://h:/p"));
        assert_eq!(uri.port(), None);
        assert_eq!(uri.authority().map(|a| a.as_str()), Some("h:"));
        assert_eq!(uri.scheme_specific_part(), "//h:/p");
        assert_eq!(uri.to_string(), "http://h:/p");

        let uri = track_try_unwrap!(Uri::new("http://u@h:0080/p"));
        assert_eq!(uri.port(), Some(80));
        assert_eq!(uri.scheme_specific_part(), "//u@h:0080/p");

        let replaced = track_try_unwrap!(uri.with_host("example.com:0443"));
        assert_eq!(replaced.port(), Some(443));
        assert_eq!(replaced.to_string(), "http://u@example.com:0443/p");
    }

    #[test]
    fn unbracketed_ipv6_host_is_rejected() {
        let uri = track_try_unwrap!(Uri::new("http://localhost/"));
        assert_eq!(
            uri.with_host("::1").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(
            Uri::new("http://::1:80/").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(
            Authority::new("fe80::1").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
        assert_eq!(track_try_unwrap!(Authority::new("[fe80::1]")).host(), "[fe80::1]");
    }

    #[test]
    fn with_host_rejects_rootless_path() {
        let uri = track_try_unwrap!(Uri::new("urn:isbn:1"));
        assert_eq!(
            uri.with_host("example.com").err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );

        let uri = track_try_unwrap!(Uri::new("mailto:"));
        let replaced = track_try_unwrap!(uri.with_host("example.com"));
        assert_eq!(replaced.to_string(), "mailto://example.com");
    }

    #[test]
    fn with_host_adds_authority_to_relative_uri() {
        let uri = track_try_unwrap!(Uri::new("/hello"));
        let replaced = track_try_unwrap!(uri.with_host("www.example.com"));
        assert_eq!(replaced.scheme(), None);
        assert_eq!(replaced.raw_path(), "/hello");
        assert_eq!(replaced.to_string(), "//www.example.com/hello");
    }

    #[test]
    fn uri_decoder_works() {
        let mut decoder = UriDecoder::default();
        let item = track_try_unwrap!(decoder.decode_exact(b"/foo?bar=baz ".as_ref()));
        assert_eq!(item.raw_path(), "/foo");
        assert_eq!(item.raw_query(), Some("bar=baz"));

        assert_eq!(
            decoder
                .decode_exact(b"/foo\r".as_ref())
                .err()
                .map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );

        let mut decoder = UriDecoder::default();
        assert_eq!(
            decoder
                .decode_exact(b"/foo".as_ref())
                .err()
                .map(|e| *e.kind()),
            Some(ErrorKind::UnexpectedEos)
        );
    }
}
