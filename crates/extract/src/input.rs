// ABOUTME: Decoding of raw HTML bytes of unknown encoding into a UTF-8 string.
// ABOUTME: Honors a BOM or a declared <meta> charset, otherwise guesses with chardetng.

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// How far into the document to look for a charset declaration.
const SNIFF_LEN: usize = 2048;

// Matches both <meta charset="x"> and <meta http-equiv content="text/html; charset=x">.
static META_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).unwrap());

/// Decode HTML bytes, trying BOM, then `<meta>` declaration, then detection.
pub fn decode_html_bytes(body: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(body) {
        let (decoded, _) = encoding.decode_without_bom_handling(&body[bom_len..]);
        return decoded.into_owned();
    }

    if let Some(encoding) = declared_charset(body) {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract the charset declared in a `<meta>` tag near the top of the document.
fn declared_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(SNIFF_LEN)];
    let caps = META_CHARSET_RE.captures(head)?;
    Encoding::for_label(caps.get(1)?.as_bytes())
}
