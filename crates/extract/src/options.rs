// ABOUTME: Configuration options for the receipt extractor including Layout, ExtractOptions, and ExtractorBuilder.
// ABOUTME: ExtractorBuilder provides a fluent API for constructing Extractor instances with custom settings.

use std::fmt;
use std::str::FromStr;

use crate::error::ExtractError;
use crate::extractor::Extractor;
use crate::rules::CompiledRules;

/// How normalized text keeps (or drops) line structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Layout {
    /// Every whitespace run becomes a single space.
    #[default]
    Flat,
    /// Block boundaries stay as newlines; blank lines are dropped.
    Lines,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Layout::Flat => "flat",
            Layout::Lines => "lines",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Layout {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Layout::Flat),
            "lines" => Ok(Layout::Lines),
            _ => Err(ExtractError::invalid_input(
                "ParseLayout",
                format!("unknown layout {:?}, expected flat or lines", s),
            )),
        }
    }
}

/// Configuration options for the extractor.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub layout: Layout,
    pub links_footer: bool,
    pub scrub_tracking_urls: bool,
    pub rules: Option<CompiledRules>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Flat,
            links_footer: false,
            scrub_tracking_urls: true,
            rules: None,
        }
    }
}

/// Builder for constructing Extractor instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ExtractorBuilder {
    opts: ExtractOptions,
}

impl ExtractorBuilder {
    /// Create a new ExtractorBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: ExtractOptions::default(),
        }
    }

    /// Set the text layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.opts.layout = layout;
        self
    }

    /// Append a human-readable list of the kept links to the text.
    pub fn links_footer(mut self, enabled: bool) -> Self {
        self.opts.links_footer = enabled;
        self
    }

    /// Remove literal tracking URLs from the text.
    pub fn scrub_tracking_urls(mut self, enabled: bool) -> Self {
        self.opts.scrub_tracking_urls = enabled;
        self
    }

    /// Replace the builtin rule set.
    pub fn rules(mut self, rules: CompiledRules) -> Self {
        self.opts.rules = Some(rules);
        self
    }

    /// Build the Extractor with the configured options.
    pub fn build(self) -> Extractor {
        Extractor::new(self.opts)
    }
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
