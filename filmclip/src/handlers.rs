use clap::ArgMatches;
use colored::Colorize;
use filmclip_core::output::DEFAULT_OUTPUT_DIR;
use filmclip_core::{ScrapeOptions, ScrapeSummary, execute_scrape};
use filmclip_scanner::ScraperConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use url::Url;

/// Expand `~` in the output directory argument
pub fn resolve_output_dir(dir: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(dir).into_owned())
}

fn seconds(value: f64, flag: &str) -> Result<Duration, String> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| format!("--{} must be a non-negative number of seconds", flag))
}

/// Build the scraper configuration from parsed arguments
pub fn build_config(args: &ArgMatches) -> Result<ScraperConfig, String> {
    let mut config = ScraperConfig::new();

    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*timeout));
    }
    if let Some(retries) = args.get_one::<u32>("retries") {
        config = config.with_max_retries(*retries);
    }

    let min_delay = seconds(*args.get_one::<f64>("min-delay").unwrap_or(&2.0), "min-delay")?;
    let max_delay = seconds(*args.get_one::<f64>("max-delay").unwrap_or(&5.0), "max-delay")?;
    if min_delay > max_delay {
        return Err("--min-delay must not be greater than --max-delay".to_string());
    }
    config = config.with_delay_range(min_delay, max_delay);

    if let Some(domain) = args.get_one::<Url>("base-domain") {
        config = config.with_base_domain(domain.as_str());
    }

    Ok(config)
}

fn print_summary(summary: &ScrapeSummary) {
    println!();
    println!(
        "{} Saved {} movie(s) to {}",
        "✓".green().bold(),
        summary.result.total_items().to_string().cyan(),
        summary.output_path.display().to_string().bright_white()
    );
    println!(
        "{} Executed at: {}",
        "→".blue(),
        summary.result.executed_at()
    );
    println!("{} Last page: {}", "→".blue(), summary.last_page);
    if let Some(ref reason) = summary.stopped {
        println!(
            "{} Stopped early: {}",
            "⚠".yellow().bold(),
            reason.to_string().yellow()
        );
    }
}

/// Run a scrape from parsed arguments, returning the summary or a printable error
pub async fn run_scrape(args: &ArgMatches) -> Result<ScrapeSummary, String> {
    let url = args
        .get_one::<Url>("URL")
        .ok_or_else(|| "A clip list URL is required".to_string())?;
    let dir = args
        .get_one::<String>("dir")
        .map(String::as_str)
        .unwrap_or(DEFAULT_OUTPUT_DIR);
    let config = build_config(args)?;

    let options = ScrapeOptions {
        url: url.clone(),
        output_dir: resolve_output_dir(dir),
        config,
        show_progress_bar: !args.get_flag("quiet"),
    };

    execute_scrape(options, None).await.map_err(|e| e.to_string())
}

/// Command line entry point.
///
/// Fails only when the run could not start (bad arguments, pagination) or its
/// output could not be written; an early stop still counts as success.
pub async fn handle_scrape(args: &ArgMatches) -> ExitCode {
    let quiet = args.get_flag("quiet");

    if !quiet && let Some(url) = args.get_one::<Url>("URL") {
        println!("\n{} Scraping {}", "→".blue(), url.as_str().bright_white());
    }

    match run_scrape(args).await {
        Ok(summary) => {
            if !quiet {
                print_summary(&summary);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
