// Library interface for console-error-scraper
// This allows tests and external crates to use the scraper components

pub mod browser;
pub mod capture;
pub mod config;
pub mod consent;
pub mod helpers;
pub mod models;
pub mod report;

use std::path::Path;
use std::sync::Arc;

/// Top-level error for a scrape run.
#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Browser(#[from] browser::BrowserError),

    #[error(transparent)]
    Report(#[from] report::ReportError),
}

/// Execute one complete scrape run: load config, launch the browser, capture
/// diagnostics, persist the result.
///
/// Configuration failures abort before any browser resource is acquired.
/// Browser resources are owned by values in this scope, so they are released
/// on every exit path.
pub fn run() -> Result<(), ScraperError> {
    let scraper_config = config::ScraperConfig::load()?;

    let ctx = Arc::new(models::RunContext::new());
    let manager = browser::BrowserManager::new(browser::BrowserConfig::default())?;
    let session = browser::PageSession::attach(manager.new_tab()?, Arc::clone(&ctx))?;

    let driver = capture::CaptureDriver::new(capture::CaptureConfig::default());
    driver.capture(
        &session,
        &consent::ConsentResolver::new(),
        &ctx,
        &scraper_config.site_url,
    );

    report::persist(
        &scraper_config.site_url,
        ctx.events(),
        ctx.consent_clicked(),
        Path::new(report::DEFAULT_OUTPUT_ROOT),
    )?;

    Ok(())
}
