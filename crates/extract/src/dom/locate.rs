// ABOUTME: Receipt container location over a parsed document.
// ABOUTME: Tries container rules in priority order and falls back to the document body.

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::rules::compiled::get_or_compile;
use crate::rules::CompiledRules;

/// How a content region was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource<'r> {
    /// A container rule matched; holds the rule's selector text.
    Container { selector: &'r str, encoded: bool },
    /// No rule matched; the region is the document body.
    Body,
}

/// A borrowed subtree of a document selected for extraction.
#[derive(Debug, Clone, Copy)]
pub struct ContentRegion<'a, 'r> {
    element: ElementRef<'a>,
    source: RegionSource<'r>,
}

impl<'a, 'r> ContentRegion<'a, 'r> {
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    pub fn source(&self) -> RegionSource<'r> {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RegionSource::Body
    }
}

/// Returns the first element matching the highest-priority container rule.
///
/// Never fails: without a match the region is the whole `<body>`.
pub fn locate_container<'a, 'r>(doc: &'a Html, rules: &'r CompiledRules) -> ContentRegion<'a, 'r> {
    for container in rules.containers() {
        if let Some(element) = doc.select(&container.selector).next() {
            debug!(selector = %container.source, "receipt container matched");
            return ContentRegion {
                element,
                source: RegionSource::Container {
                    selector: &container.source,
                    encoded: container.encoded,
                },
            };
        }
    }

    debug!("no receipt container matched, using document body");
    ContentRegion {
        element: document_body(doc),
        source: RegionSource::Body,
    }
}

/// The `<body>` element, or the root element for documents without one.
pub fn document_body(doc: &Html) -> ElementRef<'_> {
    get_or_compile("body")
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element())
}
