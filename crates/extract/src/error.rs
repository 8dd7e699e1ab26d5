// ABOUTME: Error types for the receipt extractor including ErrorCode enum and ExtractError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of failure visible to callers.
///
/// The extraction pipeline itself never fails; these cover the edges around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    Config,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidInput => "invalid input",
            ErrorCode::Config => "configuration error",
            ErrorCode::Io => "i/o error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for everything surrounding extraction.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub op: String,
    /// Human-readable detail, safe to show to API consumers.
    pub detail: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ofd-extract: {}: {}", self.op, self.code)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    /// Create an InvalidInput error.
    pub fn invalid_input(op: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            op: op.into(),
            detail: detail.into(),
            source: None,
        }
    }

    /// Create a Config error.
    pub fn config(
        op: impl Into<String>,
        detail: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Config,
            op: op.into(),
            detail: detail.into(),
            source,
        }
    }

    /// Create an Io error.
    pub fn io(op: impl Into<String>, detail: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            code: ErrorCode::Io,
            op: op.into(),
            detail: detail.into(),
            source: Some(source.into()),
        }
    }

    /// Returns true if this is an InvalidInput error.
    pub fn is_invalid_input(&self) -> bool {
        self.code == ErrorCode::InvalidInput
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}
