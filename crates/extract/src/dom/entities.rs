// ABOUTME: HTML entity decoding for markup that was stored as escaped text.
// ABOUTME: Single-pass decoder for named and numeric entities; unknown sequences are kept verbatim.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Longest entity body we look ahead for before giving up on a `&`.
const MAX_ENTITY_LEN: usize = 32;

static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("ndash", "–"),
        ("mdash", "—"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "«"),
        ("raquo", "»"),
        ("hellip", "…"),
        ("copy", "©"),
        ("reg", "®"),
        ("trade", "™"),
        ("bull", "•"),
        ("middot", "·"),
        ("deg", "°"),
        ("plusmn", "±"),
        ("times", "×"),
        ("divide", "÷"),
        ("frac12", "½"),
        ("frac14", "¼"),
        ("frac34", "¾"),
        ("euro", "€"),
        ("pound", "£"),
        ("yen", "¥"),
        ("cent", "¢"),
        ("numero", "№"),
        ("shy", "\u{00AD}"),
    ]
    .into_iter()
    .collect()
});

/// Decodes HTML entities in a single left-to-right pass.
///
/// `&amp;lt;` decodes to `&lt;`, not `<`: each entity is decoded exactly once.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match decode_one(after) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the entity at the start of `s` (just past the `&`).
///
/// Returns the replacement and the number of bytes consumed, including `;`.
fn decode_one(s: &str) -> Option<(String, usize)> {
    let end = s
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let body = &s[..end];

    let decoded = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code)?.to_string()
    } else {
        NAMED_ENTITIES.get(body)?.to_string()
    };

    Some((decoded, end + 1))
}
