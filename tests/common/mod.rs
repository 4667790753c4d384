//! Shared helpers for llms-audit integration tests
//!
//! Fixture documents live under `tests/fixtures/<grade>/`; builders in
//! [`documents`] produce documents of a particular shape inline.

#![allow(dead_code)]

pub mod corpus;
pub mod documents;
pub mod transport;

pub use corpus::{fixtures_root, CorpusError, FixtureCorpus, FixtureDocument};
pub use documents::{oversized_document, DocumentBuilder};
pub use transport::{HangingTransport, ScriptedTransport};
