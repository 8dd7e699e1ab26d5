// ABOUTME: The Extractor runs the receipt pipeline: locate, decode, classify links, strip, normalize, assemble.
// ABOUTME: Stateless per call; one immutable Extractor can serve any number of concurrent requests.

use scraper::Html;
use tracing::{debug, debug_span};

use crate::dom::cleaners::strip_noise;
use crate::dom::locate::{document_body, locate_container};
use crate::dom::nested::resolve_nested;
use crate::formats::{collect_text, normalize_text};
use crate::links::{classify_links, collect_hrefs, Splice};
use crate::options::{ExtractOptions, ExtractorBuilder};
use crate::request::ExtractRequest;
use crate::result::{append_links_footer, ExtractionResult};
use crate::rules::loader::load_builtin_rules;
use crate::rules::CompiledRules;

/// Extracts receipt text and links from HTML.
#[derive(Debug, Clone)]
pub struct Extractor {
    opts: ExtractOptions,
    rules: CompiledRules,
}

impl Extractor {
    /// Create a new ExtractorBuilder for configuring the extractor.
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Create a new Extractor with the given options.
    pub fn new(opts: ExtractOptions) -> Self {
        let rules = opts.rules.clone().unwrap_or_else(load_builtin_rules);
        Self { opts, rules }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.opts
    }

    pub fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// Extract from a validated wire request.
    pub fn extract_request(&self, request: &ExtractRequest) -> ExtractionResult {
        self.extract(&request.html)
    }

    /// Run the full pipeline over an HTML string.
    ///
    /// Never fails. The parser recovers from malformed markup, and every
    /// heuristic stage degrades to doing less rather than erroring.
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let _span = debug_span!("extract", input_len = html.len()).entered();

        let doc = Html::parse_document(html);
        let located = locate_container(&doc, &self.rules);

        let nested = resolve_nested(located.element());
        let region = nested
            .as_ref()
            .map(document_body)
            .unwrap_or_else(|| located.element());

        // Links come from the tree before stripping, with the decoded
        // container standing in for its escaped original.
        let splice = nested.as_ref().map(|_| Splice {
            replaced: located.element().id(),
            region,
        });
        let links = classify_links(collect_hrefs(&doc, splice), &self.rules);

        let strip = strip_noise(region, &self.rules);
        let raw = collect_text(region, &strip);
        let mut text = normalize_text(
            &raw,
            &self.rules,
            self.opts.layout,
            self.opts.scrub_tracking_urls,
        );

        if self.opts.links_footer {
            append_links_footer(&mut text, &links);
        }

        let result = ExtractionResult::new(text, links);
        debug!(
            fallback = located.is_fallback(),
            nested = nested.is_some(),
            length = result.length(),
            links = result.links().len(),
            "extraction finished"
        );
        result
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
