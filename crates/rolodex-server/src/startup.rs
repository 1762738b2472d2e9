//! Server startup utilities.

use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____        __          __
   / __ \____  / /___  ____/ /__  _  __
  / /_/ / __ \/ / __ \/ __  / _ \| |/_/
 / _, _/ /_/ / / /_/ / /_/ /  __/>  <
/_/ |_|\____/_/\____/\__,_/\___/_/|_|
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, public_url: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Listening: http://{}", addr);
    info!("Public:    {}", public_url);
    info!("Health:    {}/api/healthchecker", public_url.trim_end_matches('/'));
    info!("API Docs:  {}/swagger-ui", public_url.trim_end_matches('/'));
    info!("{}", separator);
}
