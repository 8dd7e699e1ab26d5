// ABOUTME: Server configuration from command-line flags with environment variable fallbacks.
// ABOUTME: Builds the shared Extractor and the Basic-auth credentials.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::Parser;
use ofd_extract::{Extractor, Layout, Rules};

use crate::auth::Credentials;

pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "password";

#[derive(Parser, Debug, Clone)]
#[command(name = "ofd-server")]
#[command(about = "HTTP service extracting receipt text and links from OFD pages")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "OFD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OFD_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Basic auth username for /extract-text
    #[arg(long, env = "BASIC_AUTH_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// Basic auth password for /extract-text
    #[arg(
        long,
        env = "BASIC_AUTH_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// JSON rule file replacing the builtin rule set
    #[arg(long, env = "OFD_RULES")]
    pub rules: Option<PathBuf>,

    /// Largest accepted request body in bytes
    #[arg(long, env = "OFD_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Append a links section to the extracted text
    #[arg(long, env = "OFD_LINKS_FOOTER", value_parser = BoolishValueParser::new())]
    pub links_footer: bool,

    /// Text layout
    #[arg(long, env = "OFD_LAYOUT", value_enum, default_value_t = Layout::Flat)]
    pub layout: Layout,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// True when the shipped placeholder credentials are still in use.
    pub fn uses_default_credentials(&self) -> bool {
        self.username == DEFAULT_USERNAME && self.password == DEFAULT_PASSWORD
    }

    /// Build the extractor, loading the rule file if one is configured.
    pub fn build_extractor(&self) -> anyhow::Result<Extractor> {
        let mut builder = Extractor::builder()
            .layout(self.layout)
            .links_footer(self.links_footer);
        if let Some(path) = &self.rules {
            builder = builder.rules(Rules::from_path(path)?.compile()?);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ServerConfig::try_parse_from(["ofd-server"]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(!config.links_footer);
        assert!(config.rules.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "ofd-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--username",
            "ofd",
            "--password",
            "s3cret",
            "--links-footer",
            "--layout",
            "lines",
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.links_footer);
        assert!(!config.uses_default_credentials());

        let extractor = config.build_extractor().unwrap();
        assert_eq!(extractor.options().layout, Layout::Lines);
        assert!(extractor.options().links_footer);
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err = ServerConfig::try_parse_from(["ofd-server", "--layout", "lins"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn missing_rule_file_is_an_error() {
        let config =
            ServerConfig::try_parse_from(["ofd-server", "--rules", "/nonexistent/rules.json"])
                .unwrap();
        assert!(config.build_extractor().is_err());
    }
}
