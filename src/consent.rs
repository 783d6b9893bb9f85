//! Best-effort dismissal of cookie/GDPR consent overlays.
//!
//! The selector catalog is plain data tried in priority order; it encodes
//! common site conventions and is inherently fragile, so every per-candidate
//! failure is swallowed and the resolver moves on to the next entry.

use crate::browser::{BrowserError, PageSession};
use crate::helpers::js_string_literal;
use crate::models::RunContext;
use std::time::{Duration, Instant};

/// How a consent candidate is located on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Css,
    XPath,
}

/// One candidate pattern for an "accept all cookies" control.
#[derive(Debug, Clone)]
pub struct ConsentSelector {
    pub kind: SelectorKind,
    pub pattern: &'static str,
}

impl ConsentSelector {
    const fn css(pattern: &'static str) -> Self {
        Self {
            kind: SelectorKind::Css,
            pattern,
        }
    }

    const fn xpath(pattern: &'static str) -> Self {
        Self {
            kind: SelectorKind::XPath,
            pattern,
        }
    }
}

/// The built-in candidate catalog, in priority order.
pub fn default_selectors() -> Vec<ConsentSelector> {
    vec![
        // Generic accept-all button texts, several case variants
        ConsentSelector::xpath("//button[contains(., 'Accept All')]"),
        ConsentSelector::xpath("//button[contains(., 'Accept all')]"),
        ConsentSelector::xpath("//button[contains(., 'ACCEPT ALL')]"),
        ConsentSelector::xpath("//button[contains(., 'Accept All Cookies')]"),
        ConsentSelector::xpath("//button[contains(., 'Accept all cookies')]"),
        // Common ID and class conventions
        ConsentSelector::css("#accept-all"),
        ConsentSelector::css("#acceptAll"),
        ConsentSelector::css("#accept_all"),
        ConsentSelector::css(".accept-all"),
        ConsentSelector::css(".acceptAll"),
        ConsentSelector::css(".accept_all"),
        // Secondary button text variations
        ConsentSelector::xpath("//button[contains(., 'I Accept')]"),
        ConsentSelector::xpath("//button[contains(., 'I Agree')]"),
        ConsentSelector::xpath("//button[contains(., 'OK')]"),
        ConsentSelector::xpath("//button[contains(., 'Got it')]"),
        ConsentSelector::xpath("//button[contains(., 'Agree')]"),
        ConsentSelector::xpath("//button[contains(., 'Continue')]"),
        // ARIA labels
        ConsentSelector::css("button[aria-label*='Accept']"),
        ConsentSelector::css("button[aria-label*='accept']"),
        // Test-id attributes
        ConsentSelector::css("button[data-testid*='accept']"),
        ConsentSelector::css("button[data-cy*='accept']"),
        // Known consent-framework markers
        ConsentSelector::css("[id*='CybotCookiebotDialogBodyLevelButtonLevelOptinAllowAll']"),
        ConsentSelector::css(".cc-allow-all"),
        ConsentSelector::css(".cookie-accept"),
        ConsentSelector::css(".gdpr-accept"),
        // Generic text + tag patterns
        ConsentSelector::xpath("//*[contains(text(), 'Accept') and (self::button or self::a)]"),
        ConsentSelector::xpath("//*[contains(text(), 'I agree') and (self::button or self::a)]"),
        ConsentSelector::xpath("//*[contains(text(), 'Continue') and (self::button or self::a)]"),
    ]
}

/// Tries the candidate catalog in order and clicks the first visible match.
pub struct ConsentResolver {
    selectors: Vec<ConsentSelector>,
    /// Bounded wait for a candidate to become visible
    visibility_timeout: Duration,
    /// Pause after a successful click for transition animations
    click_settle: Duration,
}

impl Default for ConsentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsentResolver {
    pub fn new() -> Self {
        Self::with_selectors(default_selectors())
    }

    /// Resolver over an injected catalog; tests use this to exercise each
    /// selector family with synthetic pages.
    pub fn with_selectors(selectors: Vec<ConsentSelector>) -> Self {
        Self {
            selectors,
            visibility_timeout: Duration::from_secs(2),
            click_settle: Duration::from_secs(2),
        }
    }

    /// Locate and activate a consent control, best effort.
    ///
    /// Returns whether any candidate was clicked; on success the consent flag
    /// is recorded on the run context. Never fails: each candidate gets
    /// exactly one attempt and any failure just moves on to the next.
    pub fn resolve(&self, session: &PageSession, ctx: &RunContext) -> bool {
        log::info!("Looking for 'Accept All' cookie button...");

        for selector in &self.selectors {
            match self.try_candidate(session, selector) {
                Ok(true) => {
                    log::info!("Found accept button with selector: {}", selector.pattern);
                    ctx.mark_consent_clicked();
                    std::thread::sleep(self.click_settle);
                    return true;
                }
                Ok(false) => {}
                Err(e) => {
                    // Not visible, detached mid-check, click intercepted:
                    // all treated alike, try the next candidate
                    log::debug!("Selector {:?} failed: {}", selector.pattern, e);
                }
            }
        }

        log::info!("No 'Accept All' button found or unable to click");
        false
    }

    /// Wait for one candidate to become visible and click it.
    fn try_candidate(
        &self,
        session: &PageSession,
        selector: &ConsentSelector,
    ) -> Result<bool, BrowserError> {
        let start = Instant::now();
        let visibility_script = visibility_script(selector);

        loop {
            if session.evaluate_bool(&visibility_script)? {
                break;
            }
            if start.elapsed() > self.visibility_timeout {
                return Ok(false);
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        session.evaluate_bool(&click_script(selector))
    }
}

/// JS expression yielding the candidate element (or null).
fn locator_js(selector: &ConsentSelector) -> String {
    let pattern = js_string_literal(selector.pattern);
    match selector.kind {
        SelectorKind::Css => format!("document.querySelector({})", pattern),
        SelectorKind::XPath => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            pattern
        ),
    }
}

/// JS expression: is the candidate present and visible?
fn visibility_script(selector: &ConsentSelector) -> String {
    format!(
        r#"(() => {{
            const el = {};
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            return rect.width > 0 && rect.height > 0
                && style.visibility !== 'hidden' && style.display !== 'none';
        }})()"#,
        locator_js(selector)
    )
}

/// JS expression: click the candidate, reporting whether it still existed.
fn click_script(selector: &ConsentSelector) -> String {
    format!(
        r#"(() => {{
            const el = {};
            if (!el) return false;
            el.click();
            return true;
        }})()"#,
        locator_js(selector)
    )
}
