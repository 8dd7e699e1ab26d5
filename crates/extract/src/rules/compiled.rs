// ABOUTME: Pre-compiled CSS selector cache for O(1) selector lookup.
// ABOUTME: Rule sets and the pipeline share compiled scraper selectors instead of re-parsing them.

//! Selector caching for efficient repeated DOM queries.
//!
//! CSS selector parsing is expensive relative to the actual DOM matching, and
//! every request walks the same container and ad-block rules. This module
//! keeps a process-wide cache that compiles each selector once.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Thread-safe cache of compiled CSS selectors, `None` marking invalid input.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
/// Subsequent calls with the same selector string return the cached result.
/// A poisoned lock is recovered rather than propagated; the cache only ever
/// holds fully constructed entries.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    // Another thread may have inserted while we compiled.
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Like [`get_or_compile`], but reports the parser's message on failure.
///
/// Used when validating user-supplied rule files, where the reason matters.
pub fn compile_reporting(css: &str) -> Result<Selector, String> {
    match get_or_compile(css) {
        Some(sel) => Ok(sel),
        None => Err(Selector::parse(css)
            .err()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "invalid selector".to_string())),
    }
}
