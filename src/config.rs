use crate::backend::BodyFormat;
use clap::{Parser, Subcommand};
use reqwest::Url;
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Command line for the modus-chat desktop client.
#[derive(Debug, Parser)]
#[command(name = "modus-chat")]
#[command(about = "Compare a basic LLM answer with a multi-agent workflow solution")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Backend address every request is sent to
    #[arg(long, env = "MODUS_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// How prompt and problem text is wrapped in request bodies
    #[arg(long, env = "MODUS_BODY_FORMAT", value_enum, default_value_t = BodyFormat::Direct)]
    pub body_format: BodyFormat,

    /// Maximum tracing level (error, warn, info, debug, trace)
    #[arg(long, env = "MODUS_LOG", default_value = "info", value_name = "LEVEL")]
    pub log_level: Level,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one prompt to the basic LLM endpoint and print the chat entry
    Ask {
        /// Prompt text
        prompt: String,
    },
    /// Initialise a workflow, advance it one step and print the resulting state
    Solve {
        /// Problem statement
        problem: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("unsupported base url scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: Url,
    pub body_format: BodyFormat,
}

impl BackendConfig {
    pub fn new(base_url: &str, body_format: BodyFormat) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: trimmed.to_string(),
                reason: "url cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            base_url,
            body_format,
        })
    }
}

impl Cli {
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        BackendConfig::new(&self.base_url, self.body_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cli = Cli::try_parse_from(["modus-chat"]).expect("no arguments should parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.body_format, BodyFormat::Direct);
        assert_eq!(cli.log_level, Level::INFO);

        let config = cli.backend_config().expect("default url should be valid");
        assert_eq!(
            config,
            BackendConfig::new(DEFAULT_BASE_URL, BodyFormat::Direct).expect("constant is valid")
        );
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn parses_solve_subcommand_and_legacy_format() {
        let cli = Cli::try_parse_from([
            "modus-chat",
            "--body-format",
            "legacy-envelope",
            "--base-url",
            "http://10.0.0.5:9000/",
            "solve",
            "schedule a meeting",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.body_format, BodyFormat::LegacyEnvelope);
        assert!(matches!(
            cli.command,
            Some(Command::Solve { ref problem }) if problem == "schedule a meeting"
        ));
        let config = cli.backend_config().expect("url should be valid");
        assert_eq!(config.base_url.as_str(), "http://10.0.0.5:9000/");
    }

    #[test]
    fn rejects_non_http_schemes() {
        let err = BackendConfig::new("ftp://example.com", BodyFormat::Direct)
            .expect_err("ftp should be rejected");
        assert_eq!(err, ConfigError::UnsupportedScheme("ftp".to_string()));
    }

    #[test]
    fn rejects_unparseable_urls() {
        let err = BackendConfig::new("localhost without scheme", BodyFormat::Direct)
            .expect_err("relative url should be rejected");
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }
}
