fn main() {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {}", e);
    });

    log::info!("Starting console error scraper...");

    // Workflow errors are caught here; browser resources were already
    // released by the time run() returns, so the process exits cleanly.
    if let Err(e) = console_error_scraper::run() {
        log::error!("Error during execution: {}", e);
    }
}
