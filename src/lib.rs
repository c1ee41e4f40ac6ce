//! Model, encoder and decoder for HTTP/1.x request-lines based on [bytecodec] crate.
//!
//! [bytecodec]: https://crates.io/crates/bytecodec
//!
//! # Examples
//!
//! ```
//! # extern crate httpreqline;
//! use httpreqline::{HttpVersion, RequestLine, Uri};
//!
//! # fn main() {
//! let target = Uri::new("/a/b?x=1").unwrap();
//! let line = RequestLine::new("GET", target, HttpVersion::V1_1);
//! assert_eq!(line.to_bytes(), b"GET /a/b?x=1 HTTP/1.1\r\n".to_vec());
//! assert_eq!(line.to_string(), "GET /a/b?x=1 HTTP/1.1");
//! # }
//! ```
extern crate bytecodec;
#[macro_use]
extern crate log;
#[macro_use]
extern crate trackable;

pub use bytecodec::{Error, ErrorKind, Result};

pub use method::{Method, MethodDecoder};
pub use options::DecodeOptions;
pub use request_line::{RequestLine, RequestLineDecoder, RequestLineEncoder};
pub use start_line::StartLine;
pub use uri::{Authority, Uri, UriDecoder};
pub use version::{HttpVersion, HttpVersionDecoder};

mod method;
mod options;
mod request_line;
mod start_line;
mod uri;
mod util;
mod version;
