use clap::{Arg, ArgAction, ArgGroup, Command, arg};

pub const WINDOWS_CMD: &str = "windows";

pub fn create_windows_cli() -> Command {
    Command::new(WINDOWS_CMD)
        .about("Compute the overlap significance of every window of the genome.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("ref")
                .long("ref")
                .required(true)
                .help("Path to the reference intervals (BED-like, optionally gzip'd), or - for stdin"),
        )
        .arg(
            arg!(--query <QUERY>)
                .required(true)
                .help("Path to the query intervals (BED-like, optionally gzip'd), or - for stdin"),
        )
        .arg(
            Arg::new("chrom-sizes")
                .long("chrom-sizes")
                .required(true)
                .help("Path to a two column file of sequence names and lengths"),
        )
        .arg(
            arg!(--windows <WINDOWS>)
                .required(false)
                .help("Path to a file of windows to evaluate"),
        )
        .arg(
            Arg::new("window-size")
                .long("window-size")
                .required(false)
                .requires("window-step")
                .help("Tile every sequence with windows of this many base pairs"),
        )
        .arg(
            Arg::new("window-step")
                .long("window-step")
                .required(false)
                .requires("window-size")
                .help("Distance between the starts of consecutive tiled windows"),
        )
        .group(
            ArgGroup::new("window-source")
                .args(["windows", "window-size"])
                .required(true),
        )
        .arg(
            arg!(--algorithm <ALGORITHM>)
                .required(false)
                .default_value("fast")
                .value_parser(["naive", "fast"])
                .help("Evaluate each window from scratch (naive) or reuse shared sections (fast)"),
        )
        .arg(
            arg!(--significance <SIGNIFICANCE>)
                .required(false)
                .default_value("combined")
                .value_parser(["enrichment", "depletion", "combined"])
                .help("Direction of the p-value; combined picks one per window"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout)"),
        )
        .arg(
            arg!(--format <FORMAT>)
                .required(false)
                .default_value("tsv")
                .value_parser(["tsv", "json"])
                .help("Output format"),
        )
        .arg(
            arg!(--closed)
                .action(ArgAction::SetTrue)
                .help("Input files use closed [begin, end] coordinates"),
        )
}
