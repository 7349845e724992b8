//! Subcommand implementations and the arguments they share.

pub mod attachment;
pub mod branch;
pub mod graphql;
pub mod job;
pub mod node;
pub mod platform;
pub mod project;
pub mod repository;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::{Map, Value};
use tracing::debug;

use cloudcms_core::{CloudcmsConfig, JsonObject, WaitPolicy};
use cloudcms_http::CloudCmsSession;

/// Global options every subcommand needs.
#[derive(Debug)]
pub struct Context {
    config: Option<PathBuf>,
}

impl Context {
    pub fn new(config: Option<PathBuf>) -> Self {
        Self { config }
    }

    /// Load the config and authenticate.
    pub async fn session(&self) -> Result<CloudCmsSession> {
        debug!(config = ?self.config, "loading config");
        let config = match &self.config {
            Some(path) => CloudcmsConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => CloudcmsConfig::load_default().context("Failed to load config")?,
        };

        CloudCmsSession::connect(config)
            .await
            .context("Failed to connect")
    }
}

/// Repository and branch a command works against.
#[derive(Args, Debug)]
pub struct BranchRef {
    /// Repository ID
    #[arg(short, long)]
    pub repository: String,

    /// Branch ID
    #[arg(short, long, default_value = "master")]
    pub branch: String,
}

/// Paging and sorting for listing commands.
#[derive(Args, Debug, Default)]
pub struct PageArgs {
    /// Maximum number of rows to return
    #[arg(long)]
    pub limit: Option<u64>,

    /// Number of rows to skip
    #[arg(long)]
    pub skip: Option<u64>,

    /// Sort specification as JSON, e.g. '{"title": 1}'
    #[arg(long)]
    pub sort: Option<String>,

    /// Print the full listing envelope instead of one row per line
    #[arg(long)]
    pub envelope: bool,
}

impl PageArgs {
    /// Pagination object, or `None` when no paging flag was given.
    pub fn pagination(&self) -> Result<Option<JsonObject>> {
        let mut map = Map::new();
        if let Some(limit) = self.limit {
            map.insert("limit".into(), limit.into());
        }
        if let Some(skip) = self.skip {
            map.insert("skip".into(), skip.into());
        }
        if let Some(sort) = &self.sort {
            map.insert("sort".into(), parse_object(sort)?.into_value());
        }

        Ok((!map.is_empty()).then(|| JsonObject::from(map)))
    }
}

/// Polling options for commands that wait on a job.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Fixed polling interval in milliseconds (default: backoff from 1s to 30s)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl WaitArgs {
    pub fn policy(&self) -> WaitPolicy {
        let policy = match self.interval_ms {
            Some(ms) => WaitPolicy::fixed(Duration::from_millis(ms)),
            None => WaitPolicy::default(),
        };
        match self.timeout_secs {
            Some(secs) => policy.with_timeout(Duration::from_secs(secs)),
            None => policy,
        }
    }
}

/// Parse a JSON object argument. `@path` reads the object from a file.
pub fn parse_object(arg: &str) -> Result<JsonObject> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path))?,
        None => arg.to_string(),
    };
    let value: Value = serde_json::from_str(&text).context("Invalid JSON")?;
    Ok(JsonObject::try_from(value)?)
}

/// Like [`parse_object`], with `{}` when the argument is absent.
pub fn parse_object_or_empty(arg: Option<&str>) -> Result<JsonObject> {
    arg.map(parse_object)
        .transpose()
        .map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_accepts_inline_json() {
        let obj = parse_object(r#"{"title": "Hello"}"#).unwrap();
        assert_eq!(obj.get_str("title"), Some("Hello"));
    }

    #[test]
    fn parse_object_rejects_non_objects() {
        assert!(parse_object("[1, 2]").is_err());
        assert!(parse_object("not json").is_err());
    }

    #[test]
    fn parse_object_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.json");
        std::fs::write(&path, r#"{"_type": "n:node"}"#).unwrap();

        let obj = parse_object(&format!("@{}", path.display())).unwrap();
        assert_eq!(obj.get_str("_type"), Some("n:node"));
    }

    #[test]
    fn pagination_is_none_without_flags() {
        assert!(PageArgs::default().pagination().unwrap().is_none());
    }

    #[test]
    fn pagination_collects_flags() {
        let page = PageArgs {
            limit: Some(10),
            skip: Some(20),
            sort: Some(r#"{"title": -1}"#.to_string()),
            envelope: false,
        };
        let obj = page.pagination().unwrap().unwrap();
        assert_eq!(obj.get_u64("limit"), Some(10));
        assert_eq!(obj.get_u64("skip"), Some(20));
        assert_eq!(obj.get_object("sort").unwrap().get_i64("title"), Some(-1));
    }

    #[test]
    fn zero_interval_is_rejected() {
        use clap::Parser;

        #[derive(Parser, Debug)]
        struct Harness {
            #[command(flatten)]
            wait: WaitArgs,
        }

        assert!(Harness::try_parse_from(["cloudcms", "--interval-ms", "0"]).is_err());
        let ok = Harness::try_parse_from(["cloudcms", "--interval-ms", "1"]).unwrap();
        assert_eq!(ok.wait.interval_ms, Some(1));
    }

    #[test]
    fn wait_policy_from_flags() {
        let args = WaitArgs {
            interval_ms: Some(250),
            timeout_secs: Some(5),
        };
        let policy = args.policy();
        assert_eq!(policy.first_interval(), Duration::from_millis(250));
        assert_eq!(policy.timeout, Some(Duration::from_secs(5)));

        let default = WaitArgs {
            interval_ms: None,
            timeout_secs: None,
        };
        assert_eq!(default.policy(), WaitPolicy::default());
    }
}
