// ABOUTME: Detects receipt markup stored as entity-escaped text and re-parses it as a document.
// ABOUTME: Purely heuristic; any doubt falls back to the original region without an error.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::entities::decode_entities;
use super::locate::document_body;

// An escaped tag opener: &lt;div, &lt;/p, &lt;!-- ...
static ENCODED_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&lt;(?:/?[A-Za-z]|!)").unwrap());

/// Cheap syntactic check for entity-encoded markup in serialized HTML.
pub fn looks_encoded(serialized: &str) -> bool {
    ENCODED_TAG_RE.is_match(serialized)
}

/// Decodes and re-parses the region when its content is escaped markup.
///
/// The region's inner HTML is serialized, entity-decoded and parsed as a new
/// document, so real child markup survives alongside the decoded markup.
/// Returns `None` when nothing looks encoded, or when the decoded document
/// carries no text although the original region did.
pub fn resolve_nested(region: ElementRef<'_>) -> Option<Html> {
    let inner = region.inner_html();
    if !looks_encoded(&inner) {
        return None;
    }

    let decoded = decode_entities(&inner);
    let doc = Html::parse_document(&decoded);

    if !has_text(document_body(&doc)) && has_text(region) {
        debug!("decoded container produced no text, keeping original region");
        return None;
    }

    debug!(
        encoded_len = inner.len(),
        decoded_len = decoded.len(),
        "re-parsed entity-encoded container"
    );
    Some(doc)
}

fn has_text(element: ElementRef<'_>) -> bool {
    element.text().any(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn detects_escaped_tags() {
        assert!(looks_encoded("&lt;div class=&quot;x&quot;&gt;"));
        assert!(looks_encoded("text &lt;/p&gt;"));
        assert!(looks_encoded("&lt;!-- c --&gt;"));
        assert!(!looks_encoded("5 &lt; 6"));
        assert!(!looks_encoded("<p>plain</p>"));
    }

    #[test]
    fn reparses_encoded_container() {
        let doc = Html::parse_document(
            r#"<div id="fido_cheque_container">&lt;p&gt;Receipt body&lt;/p&gt;</div>"#,
        );
        let region = first(&doc, "#fido_cheque_container");
        let nested = resolve_nested(region).expect("should re-parse");
        let body = document_body(&nested);
        let p = Selector::parse("p").unwrap();

        assert_eq!(
            body.select(&p).next().unwrap().text().collect::<String>(),
            "Receipt body"
        );
    }

    #[test]
    fn keeps_real_markup_next_to_encoded_markup() {
        let doc = Html::parse_document(
            r#"<div id="c"><a href="/cheque/pdf?id=1">PDF</a>&lt;b&gt;Total&lt;/b&gt;</div>"#,
        );
        let nested = resolve_nested(first(&doc, "#c")).unwrap();
        let a = Selector::parse("a[href]").unwrap();
        let b = Selector::parse("b").unwrap();

        assert_eq!(nested.select(&a).count(), 1);
        assert_eq!(nested.select(&b).next().unwrap().text().collect::<String>(), "Total");
    }

    #[test]
    fn passes_through_plain_regions() {
        let doc = Html::parse_document(r#"<div id="c"><p>Plain</p> 1 &lt; 2</div>"#);
        assert!(resolve_nested(first(&doc, "#c")).is_none());
    }

    #[test]
    fn falls_back_when_decoded_markup_has_no_text() {
        // Decodes to an unterminated comment swallowing all the text.
        let doc = Html::parse_document(r#"<div id="c">&lt;!--Visible</div>"#);
        assert!(resolve_nested(first(&doc, "#c")).is_none());
    }
}
