use clap::{arg, value_parser};
use filmclip_core::output::DEFAULT_OUTPUT_DIR;
use filmclip_scanner::config::DEFAULT_BASE_DOMAIN;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("filmclip")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("filmclip")
        .about("Exports a Filmarks clip list to a timestamped JSON file")
        .styles(CLAP_STYLING)
        .arg(
            arg!(<URL>)
                .help("Clip list URL (e.g. https://filmarks.com/users/your_user_id/clips)")
                .value_parser(value_parser!(Url)),
        )
        .arg(
            arg!(-d --"dir" <DIR>)
                .required(false)
                .help("Output directory")
                .default_value(DEFAULT_OUTPUT_DIR),
        )
        .arg(arg!(-q --"quiet" "Suppress the progress spinner and the summary").required(false))
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"retries" <ATTEMPTS>)
                .required(false)
                .help("Attempts per page before giving up")
                .value_parser(value_parser!(u32).range(1..))
                .default_value("3"),
        )
        .arg(
            arg!(--"min-delay" <SECONDS>)
                .required(false)
                .help("Shortest wait between pages")
                .value_parser(value_parser!(f64))
                .default_value("2"),
        )
        .arg(
            arg!(--"max-delay" <SECONDS>)
                .required(false)
                .help("Longest wait between pages")
                .value_parser(value_parser!(f64))
                .default_value("5"),
        )
        .arg(
            arg!(--"base-domain" <URL>)
                .required(false)
                .help("Prefix for the relative movie links")
                .value_parser(value_parser!(Url))
                .default_value(DEFAULT_BASE_DOMAIN),
        )
}
