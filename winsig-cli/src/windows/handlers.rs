use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use winsig_core::models::{GenomicInterval, IntervalSet};
use winsig_core::utils::tile_windows;
use winsig_model::stats::window_stats;
use winsig_model::{Algorithm, Significance, WindowModel, WindowStats};

use crate::inputs::load_inputs_from_matches;
use crate::progress::ProgressDiagnostics;

const TSV_HEADER: &str = "sequence_id\tbegin\tend\toverlap_count\tmean\tvariance\tstandard_deviation\tzscore\tsignificance\tpvalue";

pub fn write_tsv<W: Write>(writer: &mut W, stats: &[WindowStats]) -> io::Result<()> {
    writeln!(writer, "{}", TSV_HEADER)?;
    for row in stats {
        let zscore = row
            .zscore
            .map(|z| z.to_string())
            .unwrap_or_else(|| "NA".to_string());
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.window,
            row.overlap_count,
            row.mean,
            row.variance,
            row.standard_deviation,
            zscore,
            row.significance,
            row.pvalue
        )?;
    }
    Ok(())
}

fn load_windows(
    matches: &ArgMatches,
    sequence_ids: &[&String],
    sequence_sizes: &HashMap<String, i64>,
) -> Result<Vec<GenomicInterval>> {
    if let Some(path) = matches.get_one::<String>("windows") {
        let mut windows = IntervalSet::from_path(Path::new(path), matches.get_flag("closed"))
            .with_context(|| format!("Failed to load windows from {}", path))?;
        windows.filter_by_sequences(sequence_ids);
        return Ok(windows.intervals);
    }

    let size: i64 = matches
        .get_one::<String>("window-size")
        .context("--window-size or --windows is required")?
        .parse()
        .context("--window-size must be an integer")?;
    let step: i64 = matches
        .get_one::<String>("window-step")
        .context("--window-step is required with --window-size")?
        .parse()
        .context("--window-step must be an integer")?;

    Ok(tile_windows(sequence_sizes, size, step)?)
}

pub fn run_windows(matches: &ArgMatches) -> Result<()> {
    let inputs = load_inputs_from_matches(matches)?;

    let algorithm: Algorithm = matches
        .get_one::<String>("algorithm")
        .map(|value| value.parse())
        .transpose()?
        .unwrap_or_default();
    let significance: Significance = matches
        .get_one::<String>("significance")
        .map(|value| value.parse())
        .transpose()?
        .unwrap_or_default();
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("tsv");

    let sequence_ids: Vec<&String> = inputs.sequence_sizes.keys().collect();
    let windows = load_windows(matches, &sequence_ids, &inputs.sequence_sizes)?;
    log::info!("Evaluating {} windows", windows.len());

    let model = WindowModel::new(
        windows,
        inputs.refs.intervals,
        inputs.queries.intervals,
        &inputs.sequence_sizes,
        algorithm,
    );

    let diagnostics = ProgressDiagnostics::new(model.sequence_ids().len())?;
    let results = model.run(&diagnostics);
    diagnostics.finish();
    let stats = window_stats(&results?, significance)?;

    let mut writer: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut writer, &stats)
                .context("Failed to serialize window statistics")?;
            writeln!(writer)?;
        }
        _ => write_tsv(&mut writer, &stats).context("Failed to write window statistics")?,
    }
    writer.flush()?;

    Ok(())
}
