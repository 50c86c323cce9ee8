use filmclip::commands::command_argument_builder;
use filmclip::handlers::handle_scrape;
use std::process::ExitCode;
use tracing::Level;

// One request in flight at a time; the current-thread runtime is all we need
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let matches = command_argument_builder().get_matches();

    // Diagnostics go to stderr so stdout stays readable
    let level = if matches.get_flag("quiet") {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    handle_scrape(&matches).await
}
