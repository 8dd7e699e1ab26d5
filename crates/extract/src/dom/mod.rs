// ABOUTME: DOM stages of the receipt pipeline over scraper's HTML document tree.
// ABOUTME: Container location, nested-encoding resolution, entity decoding and noise stripping.

//! DOM utilities for receipt extraction.
//!
//! The stages here never mutate a parsed document. Locating returns a
//! borrowed region, the nested resolver returns a fresh document, and
//! stripping returns a set of node ids the text walk skips.

pub mod cleaners;
pub mod entities;
pub mod locate;
pub mod nested;
