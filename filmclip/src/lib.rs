pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{build_config, handle_scrape, resolve_output_dir, run_scrape};
