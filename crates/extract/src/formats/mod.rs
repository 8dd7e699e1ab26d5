// ABOUTME: Plain-text conversion for cleaned content regions.
// ABOUTME: Walks the region into a text stream, scrubs noise and collapses whitespace per layout.

//! Text normalization.
//!
//! The walk turns block elements into line breaks and table cells into tab
//! separators, concatenating inline content as-is. Normalization then removes
//! tracking URLs and promotional phrases and collapses whitespace. With
//! [`Layout::Flat`] every whitespace run becomes one space; with
//! [`Layout::Lines`] line breaks survive and blank lines are dropped.

use std::borrow::Cow;

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Node};

use crate::dom::cleaners::StripSet;
use crate::options::Layout;
use crate::rules::CompiledRules;

/// Elements that start and end a line of text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "center", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "html", "legend", "li", "main", "nav", "ol", "p",
    "pre", "section", "summary", "table", "tbody", "tfoot", "thead", "tr", "ul",
];

/// Elements separated from their siblings like table cells.
const CELL_TAGS: &[&str] = &["td", "th"];

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+"#).unwrap());

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

fn is_cell(name: &str) -> bool {
    CELL_TAGS.contains(&name)
}

/// Converts a region into a raw text stream, skipping stripped subtrees.
///
/// The result still carries the original whitespace plus the `\n` and `\t`
/// separators introduced for blocks, line breaks and cells.
pub fn collect_text(region: ElementRef<'_>, strip: &StripSet) -> String {
    let mut out = String::new();
    let mut skipping: Option<NodeId> = None;

    for edge in region.traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                match node.value() {
                    Node::Text(text) => out.push_str(text),
                    Node::Element(el) => {
                        if strip.contains(node.id()) {
                            skipping = Some(node.id());
                            continue;
                        }
                        let name = el.name();
                        if name == "br" || is_block(name) {
                            out.push('\n');
                        } else if is_cell(name) {
                            out.push('\t');
                        }
                    }
                    // Comments, doctypes and processing instructions carry no text.
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if let Some(id) = skipping {
                    if id == node.id() {
                        skipping = None;
                    }
                    continue;
                }
                if let Node::Element(el) = node.value() {
                    let name = el.name();
                    if is_block(name) {
                        out.push('\n');
                    } else if is_cell(name) {
                        out.push('\t');
                    }
                }
            }
        }
    }

    out
}

/// Collapse every whitespace run, newlines included, to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove literal tracking URLs from text unless they are explicitly kept.
pub fn scrub_tracking_urls<'t>(text: &'t str, rules: &CompiledRules) -> Cow<'t, str> {
    URL_RE.replace_all(text, |caps: &regex::Captures| {
        let url = &caps[0];
        if rules.is_tracking_url(url) && !rules.is_kept_url(url) {
            " ".to_string()
        } else {
            url.to_string()
        }
    })
}

/// Remove promotional phrases; each match leaves a space behind for the collapse.
pub fn remove_noise_phrases<'t>(text: &'t str, rules: &CompiledRules) -> Cow<'t, str> {
    let mut text = Cow::Borrowed(text);
    for phrase in rules.noise_phrases() {
        if phrase.is_match(&text) {
            text = Cow::Owned(phrase.replace_all(&text, " ").into_owned());
        }
    }
    text
}

/// Remove promotional phrases from whitespace-collapsed text until none remain.
///
/// Phrases are matched against single-spaced text, so a phrase split by block
/// boundaries or non-breaking spaces is still found. A removal can join the
/// text around it into a new match, hence the repeat.
fn strip_phrases(collapsed: String, rules: &CompiledRules) -> String {
    let mut text = collapsed;
    for _ in 0..=rules.noise_phrases().len() {
        let next = match remove_noise_phrases(&text, rules) {
            Cow::Borrowed(_) => break,
            Cow::Owned(cleaned) => collapse_whitespace(&cleaned),
        };
        text = next;
    }
    text
}

/// Full normalization of a raw text stream.
///
/// Whitespace is collapsed before the phrase filter runs and again after it,
/// so the result is a fixed point: extracting it once more changes nothing.
pub fn normalize_text(raw: &str, rules: &CompiledRules, layout: Layout, scrub_urls: bool) -> String {
    let scrubbed = if scrub_urls {
        scrub_tracking_urls(raw, rules)
    } else {
        Cow::Borrowed(raw)
    };

    match layout {
        Layout::Flat => strip_phrases(collapse_whitespace(&scrubbed), rules),
        Layout::Lines => scrubbed
            .lines()
            .map(|line| strip_phrases(collapse_whitespace(line), rules))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
