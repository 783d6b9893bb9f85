/// End-to-end tests against a real browser
/// These tests require Chrome/Chromium to be installed
/// Run with: cargo test --test end_to_end_tests -- --ignored
use console_error_scraper::browser::{BrowserConfig, BrowserManager, PageSession};
use console_error_scraper::capture::{CaptureConfig, CaptureDriver};
use console_error_scraper::consent::{ConsentResolver, ConsentSelector, SelectorKind};
use console_error_scraper::models::{EventKind, RunContext};
use std::sync::Arc;
use std::time::Duration;

fn quick_capture_config() -> CaptureConfig {
    CaptureConfig {
        navigation_timeout: Duration::from_secs(15),
        initial_settle: Duration::from_millis(300),
        network_idle_window: Duration::from_millis(300),
        network_idle_timeout: Duration::from_secs(5),
        post_idle_settle: Duration::from_millis(300),
        scroll_bottom_settle: Duration::from_millis(200),
        scroll_top_settle: Duration::from_millis(200),
    }
}

fn launch_session(ctx: &Arc<RunContext>) -> (BrowserManager, PageSession) {
    let manager =
        BrowserManager::new(BrowserConfig::default()).expect("Chrome/Chromium not installed");
    let tab = manager.new_tab().expect("failed to open tab");
    let session = PageSession::attach(tab, Arc::clone(ctx)).expect("failed to attach session");
    (manager, session)
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_browser_launch_and_teardown() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, _session) = launch_session(&ctx);
    // Dropping the manager at the end of scope must kill the process;
    // a second launch in the same test would otherwise hang on the profile lock
}

#[test]
#[ignore] // Requires Chrome/Chromium and internet
fn test_navigation_reports_dom_ready() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    session
        .navigate("https://example.com", Duration::from_secs(15))
        .expect("navigation failed");

    assert_eq!(ctx.current_url().as_deref(), Some("https://example.com"));
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_console_error_is_captured() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let page = "data:text/html,<script>console.error('broken thing');console.warn('careful');</script>";
    session
        .navigate(page, Duration::from_secs(10))
        .expect("navigation failed");
    std::thread::sleep(Duration::from_secs(1));

    let events = ctx.events();
    assert!(
        events.iter().any(|e| e.kind == EventKind::Error && e.text.contains("broken thing")),
        "expected a captured console error, got: {:?}",
        events
    );
    assert!(events
        .iter()
        .any(|e| e.kind == EventKind::Warning && e.text.contains("careful")));
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_uncaught_exception_becomes_page_error() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let page = "data:text/html,<script>setTimeout(() => { throw new Error('kaboom'); }, 10);</script>";
    session
        .navigate(page, Duration::from_secs(10))
        .expect("navigation failed");
    std::thread::sleep(Duration::from_secs(1));

    let events = ctx.events();
    assert!(
        events.iter().any(|e| e.kind == EventKind::PageError && e.text.contains("kaboom")),
        "expected a page_error event, got: {:?}",
        events
    );
}

#[test]
#[ignore] // Requires Chrome/Chromium and internet
fn test_event_url_follows_page_url_changes() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    session
        .navigate("https://example.com", Duration::from_secs(15))
        .expect("navigation failed");

    // Move the page URL after navigation; events captured afterwards must be
    // attributed to the live URL, not the configured target
    session
        .evaluate_void("history.replaceState(null, '', '/moved')")
        .unwrap();
    session
        .evaluate_void("console.error('after move')")
        .unwrap();
    std::thread::sleep(Duration::from_secs(1));

    let events = ctx.events();
    let event = events
        .iter()
        .find(|e| e.text.contains("after move"))
        .expect("console error not captured");
    assert!(
        event.url.as_deref().unwrap_or("").contains("/moved"),
        "event attributed to stale URL: {:?}",
        event.url
    );
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_consent_button_is_clicked_by_css_selector() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let page = "data:text/html,<button id='accept-all' \
                onclick=\"this.textContent='clicked'\">Accept All</button>";
    session
        .navigate(page, Duration::from_secs(10))
        .expect("navigation failed");

    let resolver = ConsentResolver::with_selectors(vec![ConsentSelector {
        kind: SelectorKind::Css,
        pattern: "#accept-all",
    }]);

    assert!(resolver.resolve(&session, &ctx));
    assert!(ctx.consent_clicked());
    assert!(session
        .evaluate_bool("document.querySelector('#accept-all').textContent === 'clicked'")
        .unwrap());
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_consent_button_is_clicked_by_xpath_text() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let page = "data:text/html,<button onclick=\"window.clicked=true\">Accept all cookies</button>";
    session
        .navigate(page, Duration::from_secs(10))
        .expect("navigation failed");

    let resolver = ConsentResolver::with_selectors(vec![ConsentSelector {
        kind: SelectorKind::XPath,
        pattern: "//button[contains(., 'Accept all')]",
    }]);

    assert!(resolver.resolve(&session, &ctx));
    assert!(session.evaluate_bool("window.clicked === true").unwrap());
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_hidden_candidate_is_skipped() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let page = "data:text/html,<button id='accept-all' style='display:none'>Accept All</button>";
    session
        .navigate(page, Duration::from_secs(10))
        .expect("navigation failed");

    let resolver = ConsentResolver::with_selectors(vec![ConsentSelector {
        kind: SelectorKind::Css,
        pattern: "#accept-all",
    }]);

    assert!(!resolver.resolve(&session, &ctx));
    assert!(!ctx.consent_clicked());
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_navigation_failure_becomes_diagnostic_event() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let driver = CaptureDriver::new(quick_capture_config());
    driver.capture(
        &session,
        &ConsentResolver::with_selectors(vec![]),
        &ctx,
        "https://nonexistent.invalid",
    );

    let events = ctx.events();
    assert_eq!(events.len(), 1, "expected exactly one event: {:?}", events);
    assert_eq!(events[0].kind, EventKind::NavigationError);
    assert!(events[0].text.contains("Navigation error"));
}

#[test]
#[ignore] // Requires Chrome/Chromium
fn test_full_capture_sequence_on_error_page() {
    let ctx = Arc::new(RunContext::new());
    let (_manager, session) = launch_session(&ctx);

    let page = "data:text/html,<body style='height:4000px'>\
                <script>console.error('e1');console.error('e2');console.error('e3');\
                console.warn('w1');</script></body>";

    let driver = CaptureDriver::new(quick_capture_config());
    driver.capture(&session, &ConsentResolver::with_selectors(vec![]), &ctx, page);

    let events = ctx.events();
    let errors = events.iter().filter(|e| e.kind == EventKind::Error).count();
    let warnings = events.iter().filter(|e| e.kind == EventKind::Warning).count();
    assert_eq!(errors, 3);
    assert_eq!(warnings, 1);
    assert!(!ctx.consent_clicked());
}
