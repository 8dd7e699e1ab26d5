// ABOUTME: ExtractionResult and link map types returned by the extraction pipeline.
// ABOUTME: Serializes to the wire shape {"text", "length", "links"} with absent link kinds omitted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of links worth keeping from a receipt page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// The receipt rendered as PDF by the OFD.
    Pdf,
    /// The tax-authority verification page.
    Fns,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkKind::Pdf => "pdf",
            LinkKind::Fns => "fns",
        };
        write!(f, "{}", s)
    }
}

/// A classified link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub kind: LinkKind,
    pub url: String,
}

/// At most one URL per link kind; the first one recorded wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<LinkKind, String>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entry` unless its kind is already present.
    ///
    /// Returns true if the entry was recorded.
    pub fn insert_first(&mut self, entry: LinkEntry) -> bool {
        if self.0.contains_key(&entry.kind) {
            return false;
        }
        self.0.insert(entry.kind, entry.url);
        true
    }

    pub fn get(&self, kind: LinkKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    pub fn contains(&self, kind: LinkKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// True once every kind has a URL and further scanning is pointless.
    pub fn is_complete(&self) -> bool {
        self.contains(LinkKind::Pdf) && self.contains(LinkKind::Fns)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in kind order (pdf, then fns).
    pub fn iter(&self) -> impl Iterator<Item = LinkEntry> + '_ {
        self.0.iter().map(|(kind, url)| LinkEntry {
            kind: *kind,
            url: url.clone(),
        })
    }
}

/// The immutable product of one extraction.
///
/// `length` is always the character count of `text`; the only way to build a
/// result is [`ExtractionResult::new`], which computes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    text: String,
    length: usize,
    links: Links,
}

impl ExtractionResult {
    pub fn new(text: String, links: Links) -> Self {
        let length = text.chars().count();
        Self {
            text,
            length,
            links,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character count of the text, not its byte length.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn into_parts(self) -> (String, Links) {
        (self.text, self.links)
    }
}

/// Heading and labels of the optional human-readable links section.
const FOOTER_HEADING: &str = "--- Ссылки ---";
const FOOTER_PDF_LABEL: &str = "PDF чека";
const FOOTER_FNS_LABEL: &str = "Проверка ФНС";

/// Append a links section to `text`, leaving it unchanged when there are no links.
pub fn append_links_footer(text: &mut String, links: &Links) {
    if links.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str(FOOTER_HEADING);
    for entry in links.iter() {
        let label = match entry.kind {
            LinkKind::Pdf => FOOTER_PDF_LABEL,
            LinkKind::Fns => FOOTER_FNS_LABEL,
        };
        text.push('\n');
        text.push_str(label);
        text.push_str(": ");
        text.push_str(&entry.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(kind: LinkKind, url: &str) -> LinkEntry {
        LinkEntry {
            kind,
            url: url.to_string(),
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let result = ExtractionResult::new("Чек №1".to_string(), Links::new());
        assert_eq!(result.length(), 6);
        assert!(result.text().len() > 6);
    }

    #[test]
    fn first_link_of_a_kind_wins() {
        let mut links = Links::new();
        assert!(links.insert_first(entry(LinkKind::Pdf, "https://a/cheque/pdf?id=1")));
        assert!(!links.insert_first(entry(LinkKind::Pdf, "https://a/cheque/pdf?id=2")));
        assert_eq!(links.get(LinkKind::Pdf), Some("https://a/cheque/pdf?id=1"));
        assert_eq!(links.len(), 1);
        assert!(!links.is_complete());
    }

    #[test]
    fn serializes_wire_shape() {
        let mut links = Links::new();
        links.insert_first(entry(LinkKind::Fns, "https://check.nalog.gov.ru/"));
        let result = ExtractionResult::new("Title Content".to_string(), links);

        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"text":"Title Content","length":13,"links":{"fns":"https://check.nalog.gov.ru/"}}"#
        );
    }

    #[test]
    fn empty_links_serialize_as_empty_object() {
        let result = ExtractionResult::new(String::new(), Links::new());
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"text":"","length":0,"links":{}}"#
        );
    }

    #[test]
    fn footer_lists_links_in_kind_order() {
        let mut links = Links::new();
        links.insert_first(entry(LinkKind::Fns, "https://check.nalog.gov.ru/"));
        links.insert_first(entry(LinkKind::Pdf, "https://ofd.ru/web/noauth/cheque/pdf?id=7"));
        let mut text = "Итого 100".to_string();
        append_links_footer(&mut text, &links);

        assert_eq!(
            text,
            "Итого 100\n\n--- Ссылки ---\nPDF чека: https://ofd.ru/web/noauth/cheque/pdf?id=7\nПроверка ФНС: https://check.nalog.gov.ru/"
        );
    }

    #[test]
    fn footer_skipped_without_links() {
        let mut text = "Итого 100".to_string();
        append_links_footer(&mut text, &Links::new());
        assert_eq!(text, "Итого 100");
    }
}
