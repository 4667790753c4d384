//! Input resolution
//!
//! Turns a path, URL, or pre-parsed mapping into an [`InputSource`]. This is
//! the only stage that can fail; everything after it reports problems as data.

mod cancel;
mod fetch;
mod mapping;
mod resolver;
mod types;

pub use cancel::CancellationToken;
pub use fetch::{parse_http_url, HttpResponse, HttpTransport, ReqwestTransport, TransportError, UrlFetcher};
pub use mapping::{MappedDocument, MappedLink, MappedSection, RenderedMapping, REQUIRED_KEYS};
pub use resolver::{normalize_path, read_mapping, read_path, resolve, resolve_with};
pub use types::{
    DocumentInput, InputError, InputPayload, InputResult, InputSource, SourceKind, SourceLocator,
};
