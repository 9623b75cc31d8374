mod inputs;
mod overlaps;
mod progress;
mod windows;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "winsig";
    pub const BIN_NAME: &str = "winsig";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Significance of overlaps between a reference and a query set of genomic intervals, genome-wide or per window.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages (RUST_LOG still takes precedence)"),
        )
        .subcommand(overlaps::cli::create_overlaps_cli())
        .subcommand(windows::cli::create_windows_cli())
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let verbose = matches
        .subcommand()
        .is_some_and(|(_, matches)| matches.get_flag("verbose"));
    init_logging(verbose);

    match matches.subcommand() {
        //
        // OVERLAPS
        //
        Some((overlaps::cli::OVERLAPS_CMD, matches)) => {
            overlaps::handlers::run_overlaps(matches)?;
        }

        //
        // WINDOWS
        //
        Some((windows::cli::WINDOWS_CMD, matches)) => {
            windows::handlers::run_windows(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
