// ABOUTME: Noise stripping for content regions: scripts, styles, non-content tags and promo blocks.
// ABOUTME: Builds a skip set of node ids so removed subtrees contribute nothing downstream.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::ElementRef;
use tracing::debug;

use crate::rules::CompiledRules;

/// Subtrees removed from a content region.
///
/// Removal is structural: a node id in the set hides the node and every
/// descendant from the text walk. The document itself is left untouched so
/// link classification can still see the pre-strip tree.
#[derive(Debug, Default, Clone)]
pub struct StripSet {
    skip: HashSet<NodeId>,
}

impl StripSet {
    /// True if `id` roots a removed subtree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.skip.contains(&id)
    }

    /// Number of removed subtrees.
    pub fn len(&self) -> usize {
        self.skip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skip.is_empty()
    }
}

/// Check if an element is a promotional block by selector or class/id marker.
pub fn is_ad_block(element: &ElementRef, rules: &CompiledRules) -> bool {
    let value = element.value();
    if value.classes().any(|c| rules.is_ad_marker(c)) {
        return true;
    }
    if value.id().is_some_and(|id| rules.is_ad_marker(id)) {
        return true;
    }
    rules.ad_selectors().iter().any(|sel| sel.matches(element))
}

/// Check if an element must be removed with its subtree.
pub fn is_noise(element: &ElementRef, rules: &CompiledRules) -> bool {
    rules.is_strip_tag(element.value().name()) || is_ad_block(element, rules)
}

/// Collects the noise subtrees below `region`.
///
/// The region root itself is never stripped, and nodes inside an already
/// stripped subtree are not recorded separately.
pub fn strip_noise(region: ElementRef<'_>, rules: &CompiledRules) -> StripSet {
    let mut skip = HashSet::new();
    let mut pending = region
        .children()
        .filter_map(ElementRef::wrap)
        .collect::<Vec<_>>();
    pending.reverse();

    // Depth-first, document order, without recursion.
    while let Some(element) = pending.pop() {
        if is_noise(&element, rules) {
            skip.insert(element.id());
            continue;
        }
        let mark = pending.len();
        pending.extend(element.children().filter_map(ElementRef::wrap));
        pending[mark..].reverse();
    }

    debug!(stripped = skip.len(), "stripped noise subtrees");
    StripSet { skip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::loader::load_builtin_rules;
    use crate::rules::Rules;
    use scraper::{Html, Selector};

    fn body(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("body").unwrap();
        doc.select(&sel).next().unwrap()
    }

    fn ids_of(doc: &Html, set: &StripSet) -> Vec<String> {
        let all = Selector::parse("*").unwrap();
        doc.select(&all)
            .filter(|el| set.contains(el.id()))
            .map(|el| el.value().name().to_string())
            .collect()
    }

    #[test]
    fn strips_script_and_style() {
        let doc = Html::parse_document(
            "<body><p>Keep</p><script>alert(1)</script><style>p{}</style></body>",
        );
        let rules = load_builtin_rules();
        let set = strip_noise(body(&doc), &rules);

        assert_eq!(ids_of(&doc, &set), vec!["script", "style"]);
    }

    #[test]
    fn strips_promo_blocks_as_whole_subtrees() {
        let doc = Html::parse_document(
            r#"<body><div class="gift-widget"><p>Вам подарки</p><a href="https://share.floctory.com">x</a></div><p>Total</p></body>"#,
        );
        let rules = load_builtin_rules();
        let set = strip_noise(body(&doc), &rules);

        // Only the block root is recorded; its descendants are hidden with it.
        assert_eq!(set.len(), 1);
        assert_eq!(ids_of(&doc, &set), vec!["div"]);
    }

    #[test]
    fn class_markers_match_whole_tokens() {
        let rules = Rules {
            ad_class_markers: vec!["ad".to_string()],
            ..Default::default()
        }
        .compile()
        .unwrap();
        let doc = Html::parse_document(
            r#"<body><div class="ad big">x</div><div class="heading">y</div><div id="AD">z</div></body>"#,
        );
        let set = strip_noise(body(&doc), &rules);

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn never_strips_region_root() {
        let doc = Html::parse_document(r#"<body><div class="promo"><p>Receipt</p></div></body>"#);
        let rules = load_builtin_rules();
        let sel = Selector::parse("div.promo").unwrap();
        let region = doc.select(&sel).next().unwrap();

        assert!(strip_noise(region, &rules).is_empty());
    }
}
