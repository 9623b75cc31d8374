use clap::{Arg, ArgAction, Command, arg};

pub const OVERLAPS_CMD: &str = "overlaps";

pub fn create_overlaps_cli() -> Command {
    Command::new(OVERLAPS_CMD)
        .about("Count overlaps between a reference and a query interval file over the whole genome.")
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
            arg!(--significance <SIGNIFICANCE>)
                .required(false)
                .value_parser(["enrichment", "depletion", "combined"])
                .help("Also compute the genome-wide p-value in this direction"),
        )
        .arg(
            arg!(--closed)
                .action(ArgAction::SetTrue)
                .help("Input files use closed [begin, end] coordinates"),
        )
}
