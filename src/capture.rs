//! Navigation and capture sequence for one run.
//!
//! The driver walks the page through load, consent dismissal, quiescence and
//! a scroll cycle while the session's observers collect diagnostics. Any
//! failure inside the sequence is converted into a `navigation_error`
//! diagnostic event instead of aborting the run.

use crate::browser::{BrowserError, PageSession};
use crate::consent::ConsentResolver;
use crate::models::{DiagnosticEvent, EventKind, RunContext};
use std::time::Duration;

/// Delays and timeouts for the capture sequence.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Bound on navigation + DOM-ready
    pub navigation_timeout: Duration,

    /// Settle delay after initial load, before consent resolution
    pub initial_settle: Duration,

    /// Quiet window that counts as network idle
    pub network_idle_window: Duration,

    /// Bound on the network-idle wait
    pub network_idle_timeout: Duration,

    /// Settle delay for late asynchronous console activity
    pub post_idle_settle: Duration,

    /// Delay after scrolling to the bottom (lazy-loaded content)
    pub scroll_bottom_settle: Duration,

    /// Delay after scrolling back to the top
    pub scroll_top_settle: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            initial_settle: Duration::from_secs(3),
            network_idle_window: Duration::from_millis(500),
            network_idle_timeout: Duration::from_secs(30),
            post_idle_settle: Duration::from_secs(5),
            scroll_bottom_settle: Duration::from_secs(3),
            scroll_top_settle: Duration::from_secs(2),
        }
    }
}

/// Runs the capture sequence against a page session.
pub struct CaptureDriver {
    config: CaptureConfig,
}

impl CaptureDriver {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Navigate to `site_url` and capture diagnostics.
    ///
    /// Never fails: any error in the sequence is appended to the run context
    /// as a single `navigation_error` event and the driver returns normally.
    pub fn capture(
        &self,
        session: &PageSession,
        resolver: &ConsentResolver,
        ctx: &RunContext,
        site_url: &str,
    ) {
        if let Err(e) = self.run_sequence(session, resolver, ctx, site_url) {
            log::warn!("Navigation error: {}", e);
            ctx.push_event(DiagnosticEvent::new(
                EventKind::NavigationError,
                format!("Navigation error: {}", e),
                None,
                Some(site_url.to_string()),
            ));
        }

        log::info!("Captured {} console errors/warnings", ctx.event_count());
    }

    fn run_sequence(
        &self,
        session: &PageSession,
        resolver: &ConsentResolver,
        ctx: &RunContext,
        site_url: &str,
    ) -> Result<(), BrowserError> {
        log::info!("Navigating to: {}", site_url);
        session.navigate(site_url, self.config.navigation_timeout)?;

        // Let the first wave of scripts run before poking at the DOM
        std::thread::sleep(self.config.initial_settle);

        resolver.resolve(session, ctx);

        log::info!("Waiting for page to fully load...");
        session.wait_for_network_idle(
            self.config.network_idle_window,
            self.config.network_idle_timeout,
        )?;

        // Delayed async activity still produces console events here
        std::thread::sleep(self.config.post_idle_settle);

        log::info!("Scrolling page to trigger additional content...");
        session.scroll_to_bottom()?;
        std::thread::sleep(self.config.scroll_bottom_settle);

        session.scroll_to_top()?;
        std::thread::sleep(self.config.scroll_top_settle);

        Ok(())
    }
}
