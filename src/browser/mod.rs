//! Browser automation module built on headless Chrome.
//!
//! Owns the browser process, the single page used for a run, and the CDP
//! observers that turn console messages and uncaught exceptions into
//! diagnostic events.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use console_error_scraper::browser::{BrowserConfig, BrowserManager, PageSession};
//! use console_error_scraper::models::RunContext;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = BrowserManager::new(BrowserConfig::default())?;
//! let ctx = Arc::new(RunContext::new());
//! let session = PageSession::attach(manager.new_tab()?, Arc::clone(&ctx))?;
//!
//! session.navigate("https://example.com", Duration::from_secs(30))?;
//! println!("captured {} events so far", ctx.event_count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod manager;
pub mod session;

// Re-export main types for convenience
pub use config::BrowserConfig;
pub use manager::{BrowserError, BrowserManager};
pub use session::PageSession;
