// ABOUTME: Main library entry point for the OFD receipt text extractor.
// ABOUTME: Re-exports the public API: Extractor, ExtractorBuilder, ExtractionResult, Links, Rules, ExtractError.

//! Receipt text extraction from raw HTML.
//!
//! This crate turns an HTML page, typically a fiscal-data operator (OFD)
//! receipt page whose receipt is embedded as entity-escaped markup, into a
//! flat text stream plus a small map of links worth keeping: the receipt PDF
//! and the tax-authority verification page.
//!
//! # Example
//!
//! ```
//! use ofd_extract::Extractor;
//!
//! let extractor = Extractor::default();
//! let result = extractor.extract(
//!     "<html><body><h1>Title</h1><p>Content</p><script>alert(1)</script></body></html>",
//! );
//! assert_eq!(result.text(), "Title Content");
//! assert_eq!(result.length(), 13);
//! assert!(result.links().is_empty());
//! ```

pub mod dom;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod input;
pub mod links;
pub mod options;
pub mod request;
pub mod result;
pub mod rules;

pub use crate::error::{ErrorCode, ExtractError};
pub use crate::extractor::Extractor;
pub use crate::input::decode_html_bytes;
pub use crate::options::{ExtractOptions, ExtractorBuilder, Layout};
pub use crate::request::ExtractRequest;
pub use crate::result::{ExtractionResult, LinkEntry, LinkKind, Links};
pub use crate::rules::loader::{builtin_rules, load_builtin_rules};
pub use crate::rules::{CompiledRules, ContainerRule, Rules};
