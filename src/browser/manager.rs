use super::config::BrowserConfig;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;

/// Owns the browser process for the duration of a run.
///
/// The manager is the sole owner of the process/context/page triple; dropping
/// it tears down the Chrome process on every exit path, so cleanup needs no
/// dedicated branch in the workflow.
pub struct BrowserManager {
    browser: Browser,
    config: BrowserConfig,
}

impl BrowserManager {
    /// Launch a browser with the given configuration.
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        // Keep the flag strings alive while LaunchOptions borrows them
        let flags = config.chrome_flags.clone();
        let args: Vec<&OsStr> = flags.iter().map(OsStr::new).collect();

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .args(args)
            .idle_browser_timeout(config.timeout * 4)
            .build()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::InitializationError(e.to_string()))?;

        log::info!("Browser setup complete");
        Ok(Self { browser, config })
    }

    /// Create the page used for the run.
    pub fn new_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreationError(e.to_string()))?;

        tab.set_default_timeout(self.config.timeout);

        if let Some(ref user_agent) = self.config.user_agent {
            tab.set_user_agent(user_agent, None, None)
                .map_err(|e| BrowserError::ConfigurationError(e.to_string()))?;
        }

        Ok(tab)
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    #[error("Browser configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tab creation failed: {0}")]
    TabCreationError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("JavaScript execution error: {0}")]
    JavaScriptError(String),

    #[error("Event listener registration failed: {0}")]
    ListenerError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires Chrome/Chromium to be installed
    fn test_browser_manager_creation() {
        let manager = BrowserManager::new(BrowserConfig::default());
        if let Ok(manager) = manager {
            assert!(manager.new_tab().is_ok());
        }
    }
}
