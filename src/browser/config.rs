use std::time::Duration;

/// Configuration for the browser instance used by a run.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,

    /// Browser window size
    pub window_size: (u32, u32),

    /// User agent presented to the target site
    pub user_agent: Option<String>,

    /// Timeout applied to navigation and bounded waits
    pub timeout: Duration,

    /// Chrome flags that reduce automation fingerprinting
    pub chrome_flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            timeout: Duration::from_secs(30),
            chrome_flags: vec![
                "--no-first-run".to_string(),
                "--disable-default-apps".to_string(),
                "--disable-extensions".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
            ],
        }
    }
}

impl BrowserConfig {
    /// Configuration for debugging (non-headless, visible browser)
    pub fn debug_mode() -> Self {
        Self {
            headless: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_size, (1920, 1080));
        assert!(config.user_agent.is_some());
        assert!(config
            .chrome_flags
            .iter()
            .any(|f| f == "--disable-blink-features=AutomationControlled"));
    }

    #[test]
    fn test_debug_mode() {
        let config = BrowserConfig::debug_mode();
        assert!(!config.headless);
    }
}
