//! Handing a captured region to the external visual search tool.
//!
//! This is the least portable part of the pipeline: it launches a browser
//! and then drives it through OS-level UI automation. There is no
//! acknowledgement from the browser, so success means the commands exited
//! cleanly.

use crate::config::Config;
use crate::error::{AppError, Result};
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// A screenshot that has been written to disk and placed on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRegion {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Destination for captured regions.
pub trait SearchSink: Send + Sync {
    /// Submits a captured region. The image is already on the clipboard.
    fn submit<'a>(&'a self, region: &'a CapturedRegion) -> BoxFuture<'a, Result<()>>;
}

/// Opens the search page in a browser and pastes the clipboard into it.
#[derive(Debug, Clone)]
pub struct BrowserSearchSink {
    browser: String,
    url: String,
    paste_delay: Duration,
}

impl BrowserSearchSink {
    pub fn new(browser: impl Into<String>, url: impl Into<String>, paste_delay: Duration) -> Self {
        Self {
            browser: browser.into(),
            url: url.into(),
            paste_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.browser, &config.search_url, config.paste_delay)
    }

    #[cfg(target_os = "macos")]
    fn launch_command(&self) -> Command {
        let mut cmd = Command::new("open");
        cmd.arg("-a").arg(&self.browser).arg(&self.url);
        cmd
    }

    #[cfg(not(target_os = "macos"))]
    fn launch_command(&self) -> Command {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(&self.url);
        cmd
    }

    async fn launch(&self) -> Result<()> {
        log::info!("opening {} in {}", self.url, self.browser);
        let output = self
            .launch_command()
            .output()
            .await
            .map_err(|e| AppError::ExternalLaunch(e.to_string()))?;
        check_output(output).map_err(AppError::ExternalLaunch)
    }

    #[cfg(target_os = "macos")]
    async fn paste(&self) -> Result<()> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(paste_script(&self.browser))
            .output()
            .await
            .map_err(|e| AppError::PasteAutomation(e.to_string()))?;
        check_output(output).map_err(AppError::PasteAutomation)
    }

    #[cfg(not(target_os = "macos"))]
    async fn paste(&self) -> Result<()> {
        Err(AppError::PasteAutomation(
            "paste automation is only available on macOS; the image is on the clipboard".to_string(),
        ))
    }
}

impl SearchSink for BrowserSearchSink {
    fn submit<'a>(&'a self, region: &'a CapturedRegion) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            log::info!(
                "submitting {}x{} capture from {}",
                region.width,
                region.height,
                region.path.display()
            );
            self.launch().await?;

            // The browser needs time to start and take focus before it can
            // receive the keystroke.
            log::debug!("waiting {:?} for {} to settle", self.paste_delay, self.browser);
            tokio::time::sleep(self.paste_delay).await;

            self.paste().await?;
            log::info!("image pasted into {}", self.browser);
            Ok(())
        })
    }
}

fn check_output(output: Output) -> std::result::Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        Err(format!("command exited with {}", output.status))
    } else {
        Err(format!("command exited with {}: {}", output.status, stderr))
    }
}

/// AppleScript that focuses `browser` and sends Cmd+V to it.
pub fn paste_script(browser: &str) -> String {
    format!(
        r#"tell application "{}"
    activate
    delay 1
    tell application "System Events"
        keystroke "v" using {{command down}}
    end tell
end tell"#,
        escape_applescript(browser)
    )
}

fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_script_targets_browser() {
        let script = paste_script("Google Chrome");
        assert!(script.starts_with(r#"tell application "Google Chrome""#));
        assert!(script.contains(r#"keystroke "v" using {command down}"#));
    }

    #[test]
    fn test_paste_script_escapes_quotes() {
        let script = paste_script(r#"Evil" to quit"#);
        assert!(script.starts_with(r#"tell application "Evil\" to quit""#));
    }

    #[test]
    fn test_from_config() {
        let config = Config::builder()
            .with_browser("Safari")
            .with_search_url("https://example.com")
            .with_paste_delay(Duration::from_millis(5))
            .build()
            .unwrap();
        let sink = BrowserSearchSink::from_config(&config);
        assert_eq!(sink.browser, "Safari");
        assert_eq!(sink.url, "https://example.com");
        assert_eq!(sink.paste_delay, Duration::from_millis(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_output_reports_stderr() {
        use std::os::unix::process::ExitStatusExt;

        let output = Output {
            status: std::process::ExitStatus::from_raw(1 << 8),
            stdout: Vec::new(),
            stderr: b"Unable to find application named 'Nope'\n".to_vec(),
        };
        let message = check_output(output).unwrap_err();
        assert!(message.ends_with("Unable to find application named 'Nope'"));
    }
}
