use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Kind of a captured diagnostic event.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Error,
    Warning,
    PageError,
    NavigationError,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Error => "error",
            EventKind::Warning => "warning",
            EventKind::PageError => "page_error",
            EventKind::NavigationError => "navigation_error",
        };
        f.write_str(s)
    }
}

/// Source location reported for a console message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventLocation {
    pub url: String,
    pub line_number: u32,
    pub column_number: u32,
}

/// One captured console message, page error, or navigation failure.
///
/// Events are appended in the order observed and never mutated afterward.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub text: String,
    pub location: Option<EventLocation>,
    pub url: Option<String>,
}

impl DiagnosticEvent {
    pub fn new(kind: EventKind, text: String, location: Option<EventLocation>, url: Option<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            kind,
            text,
            location,
            url,
        }
    }
}

/// Write-once aggregate of one scrape run, serialized to
/// `console_error/site_url/<domain>.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub site_url: String,
    pub domain: String,
    pub scraped_at: String,
    #[serde(rename = "GDPR_PRESENT")]
    pub gdpr_present: String,
    pub total_errors: usize,
    pub errors: Vec<DiagnosticEvent>,
}

/// Mutable state accumulated over one run.
///
/// The browser delivers console/exception callbacks on its transport thread,
/// so appends go through a mutex; the driver itself stays sequential. The
/// context is created once per run and threaded explicitly through each step.
#[derive(Debug, Default)]
pub struct RunContext {
    events: Mutex<Vec<DiagnosticEvent>>,
    consent_clicked: AtomicBool,
    current_url: Mutex<String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&self, event: DiagnosticEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Snapshot of the events captured so far, in observation order.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn mark_consent_clicked(&self) {
        self.consent_clicked.store(true, Ordering::SeqCst);
    }

    pub fn consent_clicked(&self) -> bool {
        self.consent_clicked.load(Ordering::SeqCst)
    }

    /// Record the page URL that subsequent events should be attributed to.
    pub fn set_current_url(&self, url: &str) {
        if let Ok(mut current) = self.current_url.lock() {
            *current = url.to_string();
        }
    }

    pub fn current_url(&self) -> Option<String> {
        match self.current_url.lock() {
            Ok(current) if !current.is_empty() => Some(current.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_json_names() {
        assert_eq!(serde_json::to_string(&EventKind::Error).unwrap(), "\"error\"");
        assert_eq!(serde_json::to_string(&EventKind::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&EventKind::PageError).unwrap(), "\"page_error\"");
        assert_eq!(
            serde_json::to_string(&EventKind::NavigationError).unwrap(),
            "\"navigation_error\""
        );
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = DiagnosticEvent {
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            kind: EventKind::Error,
            text: "boom".to_string(),
            location: Some(EventLocation {
                url: "https://example.com/app.js".to_string(),
                line_number: 12,
                column_number: 3,
            }),
            url: Some("https://example.com".to_string()),
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["location"]["lineNumber"], 12);
        assert_eq!(json["location"]["columnNumber"], 3);
        assert_eq!(json["text"], "boom");
    }

    #[test]
    fn test_run_result_field_names() {
        let result = RunResult {
            site_url: "https://example.com".to_string(),
            domain: "example.com".to_string(),
            scraped_at: "2024-01-01T00:00:00+00:00".to_string(),
            gdpr_present: "TRUE".to_string(),
            total_errors: 0,
            errors: vec![],
        };

        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert!(json.get("GDPR_PRESENT").is_some());
        assert_eq!(json["GDPR_PRESENT"], "TRUE");
        assert!(json.get("gdpr_present").is_none());
    }

    #[test]
    fn test_run_context_accumulates_in_order() {
        let ctx = RunContext::new();
        ctx.push_event(DiagnosticEvent::new(EventKind::Error, "first".to_string(), None, None));
        ctx.push_event(DiagnosticEvent::new(EventKind::Warning, "second".to_string(), None, None));

        let events = ctx.events();
        assert_eq!(ctx.event_count(), 2);
        assert_eq!(events[0].text, "first");
        assert_eq!(events[1].text, "second");
    }

    #[test]
    fn test_run_context_consent_flag() {
        let ctx = RunContext::new();
        assert!(!ctx.consent_clicked());
        ctx.mark_consent_clicked();
        assert!(ctx.consent_clicked());
    }

    #[test]
    fn test_run_context_current_url() {
        let ctx = RunContext::new();
        assert_eq!(ctx.current_url(), None);
        ctx.set_current_url("https://example.com");
        assert_eq!(ctx.current_url().as_deref(), Some("https://example.com"));
    }
}
