//! Runtime configuration.
//!
//! Values come from the environment (optionally via a `.env` file) and can be
//! overridden programmatically with [`Config::builder`].

use crate::error::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Visual search page the capture is pasted into.
pub const DEFAULT_SEARCH_URL: &str = "https://lens.google.com";
/// Browser application launched for the search.
pub const DEFAULT_BROWSER: &str = "Google Chrome";
/// Time the browser gets to launch and take focus before the paste.
pub const DEFAULT_PASTE_DELAY: Duration = Duration::from_millis(3000);
/// How long a scratch screenshot lives before it is deleted.
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_millis(5000);
/// Pause between releasing the overlay and grabbing the screen.
pub const DEFAULT_OVERLAY_SETTLE: Duration = Duration::from_millis(100);

const SCRATCH_DIR_NAME: &str = "whirl";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub search_url: String,
    pub browser: String,
    pub paste_delay: Duration,
    pub scratch_dir: PathBuf,
    pub cleanup_delay: Duration,
    pub overlay_settle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            browser: DEFAULT_BROWSER.to_string(),
            paste_delay: DEFAULT_PASTE_DELAY,
            scratch_dir: env::temp_dir().join(SCRATCH_DIR_NAME),
            cleanup_delay: DEFAULT_CLEANUP_DELAY,
            overlay_settle: DEFAULT_OVERLAY_SETTLE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// [`Config::load`] passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(url) = lookup("WHIRL_SEARCH_URL") {
            builder = builder.with_search_url(url);
        }
        if let Some(browser) = lookup("WHIRL_BROWSER") {
            builder = builder.with_browser(browser);
        }
        if let Some(dir) = lookup("WHIRL_SCRATCH_DIR") {
            builder = builder.with_scratch_dir(dir);
        }
        if let Some(ms) = lookup("WHIRL_PASTE_DELAY_MS") {
            builder = builder.with_paste_delay(parse_millis("WHIRL_PASTE_DELAY_MS", &ms)?);
        }
        if let Some(ms) = lookup("WHIRL_CLEANUP_DELAY_MS") {
            builder = builder.with_cleanup_delay(parse_millis("WHIRL_CLEANUP_DELAY_MS", &ms)?);
        }
        if let Some(ms) = lookup("WHIRL_OVERLAY_SETTLE_MS") {
            builder = builder.with_overlay_settle(parse_millis("WHIRL_OVERLAY_SETTLE_MS", &ms)?);
        }

        builder.build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Starts a builder from this config, for layering overrides on top.
    pub fn to_builder(&self) -> ConfigBuilder {
        ConfigBuilder {
            config: self.clone(),
        }
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| AppError::config(format!("{key} must be a whole number of milliseconds, got '{value}'")))
}

/// Builder for [`Config`]; `build` validates the result.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.config.browser = browser.into();
        self
    }

    pub fn with_paste_delay(mut self, delay: Duration) -> Self {
        self.config.paste_delay = delay;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = dir.into();
        self
    }

    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.config.cleanup_delay = delay;
        self
    }

    pub fn with_overlay_settle(mut self, delay: Duration) -> Self {
        self.config.overlay_settle = delay;
        self
    }

    pub fn build(self) -> Result<Config> {
        let url = url::Url::parse(&self.config.search_url)
            .map_err(|e| AppError::config(format!("Invalid search URL '{}': {}", self.config.search_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "Search URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.config.browser.trim().is_empty() {
            return Err(AppError::config("Browser name must not be empty"));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.browser, DEFAULT_BROWSER);
        assert_eq!(config.paste_delay, DEFAULT_PASTE_DELAY);
        assert!(config.scratch_dir.ends_with("whirl"));
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("WHIRL_SEARCH_URL", "https://example.com/search"),
            ("WHIRL_BROWSER", "Safari"),
            ("WHIRL_PASTE_DELAY_MS", "1500"),
            ("WHIRL_SCRATCH_DIR", "/tmp/whirl-test"),
            ("WHIRL_CLEANUP_DELAY_MS", " 20 "),
        ]))
        .unwrap();

        assert_eq!(config.search_url, "https://example.com/search");
        assert_eq!(config.browser, "Safari");
        assert_eq!(config.paste_delay, Duration::from_millis(1500));
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/whirl-test"));
        assert_eq!(config.cleanup_delay, Duration::from_millis(20));
    }

    #[test]
    fn test_invalid_delay_is_rejected() {
        let err = Config::from_lookup(lookup(&[("WHIRL_PASTE_DELAY_MS", "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("WHIRL_PASTE_DELAY_MS"));
    }

    #[test]
    fn test_builder_rejects_non_http_url() {
        let err = Config::builder()
            .with_search_url("file:///etc/passwd")
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_garbage_url() {
        assert!(Config::builder().with_search_url("not a url").build().is_err());
    }

    #[test]
    fn test_to_builder_keeps_existing_values() {
        let base = Config::builder().with_browser("Arc").build().unwrap();
        let config = base
            .to_builder()
            .with_paste_delay(Duration::from_millis(10))
            .build()
            .unwrap();
        assert_eq!(config.browser, "Arc");
        assert_eq!(config.paste_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_builder_rejects_empty_browser() {
        assert!(Config::builder().with_browser("  ").build().is_err());
    }
}
