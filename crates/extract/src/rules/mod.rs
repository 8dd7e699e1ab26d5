// ABOUTME: Ordered rule-set data models for receipt extraction and their compiled form.
// ABOUTME: Container priorities, noise deny-lists and link patterns live here as data, not control flow.

//! Extraction rule sets.
//!
//! Every piece of tuning data the pipeline consults is an ordered list in
//! [`Rules`], deserialized from JSON. [`Rules::compile`] validates all
//! selectors and regular expressions up front and produces [`CompiledRules`],
//! which the pipeline stages query through small predicate methods.
//!
//! Submodules:
//! - `compiled`: process-wide cache of parsed CSS selectors.
//! - `loader`: the embedded builtin rule set and file loading.

pub mod compiled;
pub mod loader;

use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder, RegexSet};
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::rules::compiled::compile_reporting;

/// A known receipt container, tried in list order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContainerRule {
    /// CSS selector, e.g. `#fido_cheque_container`
    pub selector: String,
    /// Whether this container is known to carry entity-encoded markup
    #[serde(default)]
    pub encoded: bool,
}

/// The full, serializable rule set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Rules {
    /// Receipt containers in priority order
    #[serde(default)]
    pub containers: Vec<ContainerRule>,
    /// Tag names whose whole subtree is removed before text conversion
    #[serde(default)]
    pub strip_tags: Vec<String>,
    /// CSS selectors of promotional blocks
    #[serde(default)]
    pub ad_selectors: Vec<String>,
    /// Class or id tokens marking promotional blocks (exact, case-insensitive)
    #[serde(default)]
    pub ad_class_markers: Vec<String>,
    /// Substrings of an href path identifying a receipt PDF
    #[serde(default)]
    pub pdf_patterns: Vec<String>,
    /// Substrings that veto a PDF match (offer documents)
    #[serde(default)]
    pub oferta_markers: Vec<String>,
    /// Tax-authority hosts, subdomains included
    #[serde(default)]
    pub fns_hosts: Vec<String>,
    /// Regexes over the whole href marking analytics, share and chat links
    #[serde(default)]
    pub tracking_patterns: Vec<String>,
    /// Regexes of URLs that survive text-level tracking scrubbing
    #[serde(default)]
    pub keep_url_patterns: Vec<String>,
    /// Case-insensitive regexes of promotional phrases removed from text
    #[serde(default)]
    pub noise_phrases: Vec<String>,
}

/// A container rule with its selector parsed.
#[derive(Debug, Clone)]
pub struct CompiledContainer {
    pub source: String,
    pub selector: Selector,
    pub encoded: bool,
}

/// A validated rule set ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    rules: Rules,
    containers: Vec<CompiledContainer>,
    strip_tags: HashSet<String>,
    ad_selectors: Vec<Selector>,
    ad_class_markers: HashSet<String>,
    pdf_patterns: Option<AhoCorasick>,
    oferta_markers: Option<AhoCorasick>,
    fns_hosts: Vec<String>,
    tracking: RegexSet,
    keep_urls: RegexSet,
    noise_phrases: Vec<Regex>,
}

const OP: &str = "CompileRules";

impl Rules {
    /// Validates and compiles every selector and pattern.
    ///
    /// The first invalid entry aborts compilation with a Config error naming
    /// the field and index, e.g. `ad_selectors[3]`.
    pub fn compile(&self) -> Result<CompiledRules, ExtractError> {
        let containers = self
            .containers
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                compile_reporting(&rule.selector)
                    .map(|selector| CompiledContainer {
                        source: rule.selector.clone(),
                        selector,
                        encoded: rule.encoded,
                    })
                    .map_err(|e| invalid_entry("containers", i, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ad_selectors = self
            .ad_selectors
            .iter()
            .enumerate()
            .map(|(i, css)| compile_reporting(css).map_err(|e| invalid_entry("ad_selectors", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let tracking = regex_set("tracking_patterns", &self.tracking_patterns)?;
        let keep_urls = regex_set("keep_url_patterns", &self.keep_url_patterns)?;

        let noise_phrases = self
            .noise_phrases
            .iter()
            .enumerate()
            .map(|(i, p)| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| invalid_entry("noise_phrases", i, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledRules {
            rules: self.clone(),
            containers,
            strip_tags: lowercase_set(&self.strip_tags),
            ad_selectors,
            ad_class_markers: lowercase_set(&self.ad_class_markers),
            pdf_patterns: substring_matcher("pdf_patterns", &self.pdf_patterns)?,
            oferta_markers: substring_matcher("oferta_markers", &self.oferta_markers)?,
            fns_hosts: self
                .fns_hosts
                .iter()
                .map(|h| h.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            tracking,
            keep_urls,
            noise_phrases,
        })
    }
}

impl CompiledRules {
    /// The rule set this was compiled from.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Receipt containers in priority order.
    pub fn containers(&self) -> &[CompiledContainer] {
        &self.containers
    }

    /// True if elements with this tag name are removed with their subtree.
    pub fn is_strip_tag(&self, name: &str) -> bool {
        self.strip_tags.contains(&name.to_ascii_lowercase())
    }

    /// Promotional block selectors.
    pub fn ad_selectors(&self) -> &[Selector] {
        &self.ad_selectors
    }

    /// True if a single class name or id equals a promotional marker.
    pub fn is_ad_marker(&self, token: &str) -> bool {
        !self.ad_class_markers.is_empty()
            && self.ad_class_markers.contains(&token.to_lowercase())
    }

    /// True if the href path contains a receipt-PDF pattern.
    pub fn has_pdf_pattern(&self, path: &str) -> bool {
        self.pdf_patterns
            .as_ref()
            .is_some_and(|ac| ac.is_match(path))
    }

    /// True if the href carries an offer-document marker.
    pub fn has_oferta_marker(&self, href: &str) -> bool {
        self.oferta_markers
            .as_ref()
            .is_some_and(|ac| ac.is_match(href))
    }

    /// True if `host` is a tax-authority host or one of its subdomains.
    pub fn is_fns_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.fns_hosts.iter().any(|fns| {
            host == *fns
                || host
                    .strip_suffix(fns.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// True if the URL points at an analytics, share, chat or marketing host.
    pub fn is_tracking_url(&self, url: &str) -> bool {
        self.tracking.is_match(url)
    }

    /// True if the URL must survive text-level scrubbing.
    pub fn is_kept_url(&self, url: &str) -> bool {
        self.keep_urls.is_match(url)
    }

    /// Promotional phrase patterns, case-insensitive.
    pub fn noise_phrases(&self) -> &[Regex] {
        &self.noise_phrases
    }
}

impl Default for CompiledRules {
    fn default() -> Self {
        loader::load_builtin_rules()
    }
}

fn invalid_entry(field: &str, index: usize, reason: impl Into<String>) -> ExtractError {
    let reason = reason.into();
    ExtractError::config(
        OP,
        format!("{}[{}]", field, index),
        Some(anyhow::anyhow!(reason)),
    )
}

fn lowercase_set(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn regex_set(field: &str, patterns: &[String]) -> Result<RegexSet, ExtractError> {
    // Compile one by one first so the error names the offending entry.
    for (i, p) in patterns.iter().enumerate() {
        Regex::new(p).map_err(|e| invalid_entry(field, i, e.to_string()))?;
    }
    RegexSet::new(patterns).map_err(|e| {
        ExtractError::config(OP, field.to_string(), Some(anyhow::anyhow!(e.to_string())))
    })
}

fn substring_matcher(field: &str, patterns: &[String]) -> Result<Option<AhoCorasick>, ExtractError> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .map(Some)
        .map_err(|e| ExtractError::config(OP, field.to_string(), Some(anyhow::anyhow!(e))))
}
