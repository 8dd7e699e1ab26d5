// ABOUTME: Link classification over the pre-strip document: receipt PDF and tax-authority links.
// ABOUTME: Tracking links are vetoed outright; the first qualifying anchor per kind wins.

//! Link classification.
//!
//! Anchors are read in document order from the tree as parsed, before any
//! noise stripping. When the receipt container was re-parsed from escaped
//! markup, the decoded anchors take the container's place in that order.

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node};
use tracing::{debug, trace};
use url::Url;

use crate::result::{LinkEntry, LinkKind, Links};
use crate::rules::CompiledRules;

/// Base used to resolve relative hrefs; its host never matches a real rule.
static RELATIVE_BASE: Lazy<Option<Url>> = Lazy::new(|| Url::parse("http://relative.invalid/").ok());

/// A re-parsed region standing in for an element of the original document.
#[derive(Debug, Clone, Copy)]
pub struct Splice<'a> {
    pub replaced: NodeId,
    pub region: ElementRef<'a>,
}

/// Classifies a single href.
///
/// Tracking matches are checked first and veto everything else. A PDF link
/// needs a receipt-PDF pattern in its path and no offer-document marker
/// anywhere in the href; an FNS link needs a tax-authority host.
pub fn classify_href(href: &str, rules: &CompiledRules) -> Option<LinkKind> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if rules.is_tracking_url(href) {
        trace!(href, "tracking link dropped");
        return None;
    }

    let resolved = RELATIVE_BASE.as_ref().and_then(|base| base.join(href).ok());
    let path = resolved.as_ref().map(Url::path).unwrap_or(href);

    if rules.has_pdf_pattern(path) && !rules.has_oferta_marker(href) {
        return Some(LinkKind::Pdf);
    }

    let host = resolved.as_ref().and_then(Url::host_str);
    if host.is_some_and(|h| rules.is_fns_host(h)) {
        return Some(LinkKind::Fns);
    }

    None
}

/// Collects anchor hrefs of `doc` in document order.
///
/// With a splice, the replaced element's subtree is skipped and the anchors
/// of the re-parsed region are emitted in its place.
pub fn collect_hrefs<'a>(doc: &'a Html, splice: Option<Splice<'a>>) -> Vec<&'a str> {
    let mut hrefs = Vec::new();
    let mut skipping: Option<NodeId> = None;

    for edge in doc.tree.root().traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                if let Some(s) = splice.filter(|s| s.replaced == node.id()) {
                    skipping = Some(node.id());
                    hrefs.extend(anchor_hrefs(s.region));
                    continue;
                }
                if let Node::Element(el) = node.value() {
                    if el.name() == "a" {
                        if let Some(href) = el.attr("href") {
                            hrefs.push(href);
                        }
                    }
                }
            }
            Edge::Close(node) => {
                if skipping == Some(node.id()) {
                    skipping = None;
                }
            }
        }
    }

    hrefs
}

fn anchor_hrefs<'a>(region: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    region
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter_map(|el| el.value().attr("href"))
}

/// Builds the link map from hrefs in document order.
pub fn classify_links<'h>(hrefs: impl IntoIterator<Item = &'h str>, rules: &CompiledRules) -> Links {
    let mut links = Links::new();
    for href in hrefs {
        if let Some(kind) = classify_href(href, rules) {
            let url = href.trim().to_string();
            if links.insert_first(LinkEntry { kind, url }) {
                debug!(%kind, "kept receipt link");
            }
            if links.is_complete() {
                break;
            }
        }
    }
    links
}
