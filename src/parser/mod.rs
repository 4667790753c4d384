//! Document parsing
//!
//! Normalized markdown (or a validated mapping) → [`ParsedDocument`].

mod links;
mod markdown;
mod types;

pub use links::{classify_link, is_well_formed};
pub use markdown::DocumentParser;
pub use types::{CodeBlock, LinkKind, ParsedDocument, ParsedLink, ParsedSection};
