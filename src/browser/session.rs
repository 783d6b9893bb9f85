use super::manager::BrowserError;
use crate::models::{DiagnosticEvent, EventKind, EventLocation, RunContext};
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::Runtime;
use headless_chrome::Tab;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The single page used for a run, with console/exception observers attached.
///
/// Observers live for the lifetime of the page and append diagnostic events
/// to the shared [`RunContext`]; delivery happens on the CDP transport
/// thread, asynchronously to the sequential capture driver.
pub struct PageSession {
    tab: Arc<Tab>,
    ctx: Arc<RunContext>,
}

impl PageSession {
    /// Wrap a tab and register the console-message and uncaught-exception
    /// observers.
    pub fn attach(tab: Arc<Tab>, ctx: Arc<RunContext>) -> Result<Self, BrowserError> {
        tab.enable_runtime()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))?;

        let observer_ctx = Arc::clone(&ctx);
        // Weak handle: the tab stores its listeners, so a strong reference
        // here would form a cycle and leak the tab
        let observer_tab = Arc::downgrade(&tab);
        tab.add_event_listener(Arc::new(move |event: &Event| match event {
            Event::RuntimeConsoleAPICalled(e) => {
                if let Some(kind) = console_kind(&e.params.Type) {
                    let text = console_text(&e.params.args);
                    let location = top_frame_location(e.params.stack_trace.as_ref());
                    log::info!("Console {}: {}", kind, text);
                    let url = capture_url(&observer_tab, &observer_ctx);
                    observer_ctx.push_event(DiagnosticEvent::new(kind, text, location, url));
                }
            }
            Event::RuntimeExceptionThrown(e) => {
                let text = exception_text(&e.params.exception_details);
                log::info!("Page error: {}", text);
                let url = capture_url(&observer_tab, &observer_ctx);
                observer_ctx.push_event(DiagnosticEvent::new(EventKind::PageError, text, None, url));
            }
            _ => {}
        }))
        .map_err(|e| BrowserError::ListenerError(e.to_string()))?;

        Ok(Self { tab, ctx })
    }

    /// Navigate to a URL and wait until the DOM is ready, bounded by
    /// `timeout`.
    ///
    /// DOM-ready (not full load) is the success condition for the navigation
    /// step; delayed resources are handled by the later waits.
    pub fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.ctx.set_current_url(url);

        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationError(format!("Failed to navigate to {}: {}", url, e)))?;

        self.wait_for_dom_ready(timeout)
    }

    /// Poll `document.readyState` until the DOM is at least interactive.
    fn wait_for_dom_ready(&self, timeout: Duration) -> Result<(), BrowserError> {
        let start = Instant::now();

        loop {
            if start.elapsed() > timeout {
                return Err(BrowserError::Timeout(format!(
                    "Navigation timeout after {:?}: document never became ready",
                    timeout
                )));
            }

            if let Ok(state) = self.evaluate_string("document.readyState") {
                if state == "interactive" || state == "complete" {
                    return Ok(());
                }
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Wait for network quiescence, bounded by `timeout`.
    ///
    /// Chrome exposes no direct network-idle signal over plain JS, so this
    /// polls the page's resource-timing entry count until it holds steady for
    /// `idle_window`. Returns whether quiescence was observed before the
    /// deadline; elapsing is not an error.
    pub fn wait_for_network_idle(
        &self,
        idle_window: Duration,
        timeout: Duration,
    ) -> Result<bool, BrowserError> {
        let script = "performance.getEntriesByType('resource').length";
        let start = Instant::now();
        let mut last_count: Option<u64> = None;
        let mut stable_since = Instant::now();

        loop {
            if start.elapsed() > timeout {
                log::info!(
                    "Network never went idle within {:?}; continuing with what was captured",
                    timeout
                );
                return Ok(false);
            }

            match self.evaluate_u64(script) {
                Ok(count) => {
                    if last_count == Some(count) {
                        if stable_since.elapsed() >= idle_window {
                            return Ok(true);
                        }
                    } else {
                        last_count = Some(count);
                        stable_since = Instant::now();
                    }
                }
                Err(_) => {
                    // Evaluation can fail transiently mid-navigation
                    last_count = None;
                    stable_since = Instant::now();
                }
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Evaluate a JS expression and require a boolean result.
    pub fn evaluate_bool(&self, script: &str) -> Result<bool, BrowserError> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?;

        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    /// Evaluate a JS expression for its side effects.
    pub fn evaluate_void(&self, script: &str) -> Result<(), BrowserError> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?;
        Ok(())
    }

    fn evaluate_string(&self, script: &str) -> Result<String, BrowserError> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?;

        result
            .value
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .ok_or_else(|| BrowserError::JavaScriptError("Script returned no string".to_string()))
    }

    fn evaluate_u64(&self, script: &str) -> Result<u64, BrowserError> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?;

        result
            .value
            .and_then(|v| v.as_u64())
            .ok_or_else(|| BrowserError::JavaScriptError("Script returned no number".to_string()))
    }

    /// Scroll to the bottom of the document to trigger lazy-loaded content.
    pub fn scroll_to_bottom(&self) -> Result<(), BrowserError> {
        self.evaluate_void("window.scrollTo(0, document.body.scrollHeight)")
    }

    /// Scroll back to the top of the document.
    pub fn scroll_to_top(&self) -> Result<(), BrowserError> {
        self.evaluate_void("window.scrollTo(0, 0)")
    }

    /// The run context this session reports into.
    pub fn ctx(&self) -> &Arc<RunContext> {
        &self.ctx
    }
}

/// Page URL to attribute a captured event to: read live from the tab when it
/// is still around (redirects move it past the configured target), falling
/// back to the last URL the driver recorded.
fn capture_url(tab: &std::sync::Weak<Tab>, ctx: &RunContext) -> Option<String> {
    tab.upgrade()
        .map(|tab| tab.get_url())
        .or_else(|| ctx.current_url())
}

/// Map a CDP console call type onto a captured event kind.
///
/// Only `error` and `warning` severities are recorded; everything else is
/// ignored.
fn console_kind(call_type: &Runtime::ConsoleAPICalledEventTypeOption) -> Option<EventKind> {
    use Runtime::ConsoleAPICalledEventTypeOption as CallType;
    match call_type {
        CallType::Error => Some(EventKind::Error),
        CallType::Warning => Some(EventKind::Warning),
        _ => None,
    }
}

/// Join a console call's arguments into the message text.
fn console_text(args: &[Runtime::RemoteObject]) -> String {
    args.iter()
        .filter_map(|arg| render_remote_value(arg.value.as_ref(), arg.description.as_deref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best-effort rendering of a CDP remote object, mirroring what the console
/// would show.
fn render_remote_value(value: Option<&serde_json::Value>, description: Option<&str>) -> Option<String> {
    if let Some(value) = value {
        if let Some(s) = value.as_str() {
            return Some(s.to_string());
        }
        if value.is_null() {
            return Some("null".to_string());
        }
        if let Ok(serialized) = serde_json::to_string(value) {
            return Some(serialized);
        }
    }

    // Error objects, DOM nodes and the like only carry a description
    description.map(|d| d.to_string())
}

/// Source location of the console call, taken from the top stack frame.
fn top_frame_location(stack_trace: Option<&Runtime::StackTrace>) -> Option<EventLocation> {
    let frame = stack_trace?.call_frames.first()?;
    Some(EventLocation {
        url: frame.url.clone(),
        line_number: frame.line_number as u32,
        column_number: frame.column_number as u32,
    })
}

/// Stringified form of an uncaught exception.
fn exception_text(details: &Runtime::ExceptionDetails) -> String {
    let description = details
        .exception
        .as_ref()
        .and_then(|exc| render_remote_value(exc.value.as_ref(), exc.description.as_deref()));

    match description {
        // "Uncaught" alone is the usual detail text; the description carries
        // the actual error message and stack
        Some(description) if !description.is_empty() => description,
        _ => details.text.clone(),
    }
}
