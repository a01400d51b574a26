//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_DIRECTORY_URL: &str = "https://ontap.pl/warszawa/multitaps";
pub const DEFAULT_PRICE_LIMIT: i64 = 18;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Multitap directory listing the bars to track
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Serving size whose price is compared
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Currency suffix stripped from amounts
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Default upper price bound for the beers query
    #[serde(default = "default_price_limit")]
    pub price_limit: i64,

    /// Maximum number of bars fetched at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Timeout for a single bar fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Deadline for fetching all bars, in seconds
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS origins allowed by the HTTP server (empty allows any)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Filter: keywords that must appear in the beer name
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Filter: keywords that must NOT appear in the beer name
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}

fn default_directory_url() -> String {
    DEFAULT_DIRECTORY_URL.to_string()
}

fn default_unit() -> String {
    "0.5l".to_string()
}

fn default_currency() -> String {
    "zł".to_string()
}

fn default_price_limit() -> i64 {
    DEFAULT_PRICE_LIMIT
}

fn default_max_concurrency() -> usize {
    16
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_deadline_secs() -> u64 {
    120
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            proxy: None,
            unit: default_unit(),
            currency: default_currency(),
            price_limit: default_price_limit(),
            max_concurrency: default_max_concurrency(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            deadline_secs: default_deadline_secs(),
            format: OutputFormat::Table,
            port: default_port(),
            allowed_origins: Vec::new(),
            keywords: Vec::new(),
            exclude_keywords: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ontap-tracker").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparsable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("ONTAP_DIRECTORY_URL") {
            self.directory_url = url;
        }

        if let Ok(proxy) = std::env::var("ONTAP_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(limit) = std::env::var("ONTAP_PRICE_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.price_limit = l;
            }
        }

        if let Ok(port) = std::env::var("ONTAP_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Ok(concurrency) = std::env::var("ONTAP_CONCURRENCY") {
            if let Ok(c) = concurrency.parse() {
                self.max_concurrency = c;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.directory_url, "https://ontap.pl/warszawa/multitaps");
        assert_eq!(config.unit, "0.5l");
        assert_eq!(config.currency, "zł");
        assert_eq!(config.price_limit, 18);
        assert_eq!(config.max_concurrency, 16);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.deadline_secs, 120);
        assert_eq!(config.port, 3000);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.proxy.is_none());
        assert!(config.allowed_origins.is_empty());
        assert!(config.keywords.is_empty());
        assert!(config.exclude_keywords.is_empty());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            unit = "0.4l"
            price_limit = 15
            max_concurrency = 4
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.unit, "0.4l");
        assert_eq!(config.price_limit, 15);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.currency, "zł");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            directory_url = "https://ontap.pl/krakow/multitaps"
            proxy = "socks5://localhost:1080"
            unit = "0.3l"
            currency = "PLN"
            price_limit = 12
            max_concurrency = 8
            fetch_timeout_secs = 10
            deadline_secs = 60
            format = "json"
            port = 8080
            allowed_origins = ["http://localhost:8080"]
            keywords = ["ipa"]
            exclude_keywords = ["radler"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.directory_url, "https://ontap.pl/krakow/multitaps");
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert_eq!(config.unit, "0.3l");
        assert_eq!(config.currency, "PLN");
        assert_eq!(config.price_limit, 12);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.deadline_secs, 60);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origins, vec!["http://localhost:8080"]);
        assert_eq!(config.keywords, vec!["ipa"]);
        assert_eq!(config.exclude_keywords, vec!["radler"]);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            price_limit = 20
            port = 4000
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.price_limit, 20);
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let err = Config::from_file("/nonexistent/path/config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "unit = \"0.4l\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.unit, "0.4l");
    }

    #[test]
    fn test_config_with_env() {
        let orig_limit = std::env::var("ONTAP_PRICE_LIMIT").ok();
        let orig_port = std::env::var("ONTAP_PORT").ok();
        let orig_concurrency = std::env::var("ONTAP_CONCURRENCY").ok();

        std::env::set_var("ONTAP_PRICE_LIMIT", "21");
        std::env::set_var("ONTAP_PORT", "not_a_port");
        std::env::set_var("ONTAP_CONCURRENCY", "2");

        let config = Config::new().with_env();
        assert_eq!(config.price_limit, 21);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_concurrency, 2);

        for (key, orig) in [
            ("ONTAP_PRICE_LIMIT", orig_limit),
            ("ONTAP_PORT", orig_port),
            ("ONTAP_CONCURRENCY", orig_concurrency),
        ] {
            match orig {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}
