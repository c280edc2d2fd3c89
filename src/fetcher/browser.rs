//! Browser discovery and launch
//!
//! Finds a local Chrome/Chromium executable and launches it over CDP. The
//! `CHROMIUM_PATH` environment variable overrides all other search methods.

use crate::{Result, SitebriefError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Locates a Chrome/Chromium executable on the system
pub fn find_browser_executable() -> Result<PathBuf> {
    // Environment variable overrides all other methods
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            tracing::info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        tracing::warn!(
            "CHROMIUM_PATH points to non-existent file: {}",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for candidate in candidates {
        let path = PathBuf::from(candidate);
        if path.exists() {
            tracing::info!("Found browser at: {}", path.display());
            return Ok(path);
        }
    }

    // Last resort: ask the shell
    for cmd in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(output) = Command::new("which").arg(cmd).output() {
            if output.status.success() {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    tracing::info!("Found browser via 'which': {}", path_str);
                    return Ok(PathBuf::from(path_str));
                }
            }
        }
    }

    Err(SitebriefError::BrowserSetup(
        "no Chrome/Chromium executable found; set CHROMIUM_PATH to override".to_string(),
    ))
}

/// Launches the browser and spawns its CDP event handler task
pub(crate) async fn launch_browser(headless: bool) -> Result<(Browser, JoinHandle<()>)> {
    let chrome_path = find_browser_executable()?;

    // Slightly above the fetch bound so the fetcher's own timeout fires
    // first and the failure is classified as a timeout
    let mut builder = BrowserConfig::builder()
        .request_timeout(super::PAGE_LOAD_TIMEOUT + Duration::from_secs(5))
        .chrome_executable(chrome_path)
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu");

    // The builder defaults to headless; with_head() attaches a window
    if !headless {
        builder = builder.with_head();
    }

    let config = builder.build().map_err(SitebriefError::BrowserSetup)?;

    let (browser, mut handler) = Browser::launch(config).await?;

    // The handler stream must be drained for the CDP connection to make progress
    let handler_task = tokio::task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::trace!("Browser handler event error: {}", e);
            }
        }
        tracing::debug!("Browser handler task finished");
    });

    Ok((browser, handler_task))
}
