use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::ArgMatches;

use winsig_core::models::GenomicInterval;
use winsig_core::overlaps::count_overlaps;
use winsig_model::{Algorithm, GenomeStats, LogDiagnostics, Significance, WindowModel};

use crate::inputs::{Inputs, load_inputs_from_matches};

/// One window covering each sequence end to end.
fn whole_sequence_windows(sequence_sizes: &HashMap<String, i64>) -> Vec<GenomicInterval> {
    sequence_sizes
        .iter()
        .map(|(name, length)| GenomicInterval::new(name.as_str(), 0, *length))
        .collect()
}

pub fn genome_stats(inputs: Inputs, significance: Significance) -> Result<GenomeStats> {
    let model = WindowModel::new(
        whole_sequence_windows(&inputs.sequence_sizes),
        inputs.refs.intervals,
        inputs.queries.intervals,
        &inputs.sequence_sizes,
        Algorithm::Fast,
    );
    let results = model.run(&LogDiagnostics)?;

    Ok(GenomeStats::new(&results, significance)?)
}

pub fn run_overlaps(matches: &ArgMatches) -> Result<()> {
    let inputs = load_inputs_from_matches(matches)?;

    let overlap_count = count_overlaps(&inputs.refs, &inputs.queries);

    let Some(significance) = matches.get_one::<String>("significance") else {
        println!("{}", overlap_count);
        return Ok(());
    };
    let significance: Significance = significance.parse()?;

    let stats = genome_stats(inputs, significance)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to serialize genome statistics")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use winsig_core::models::IntervalSet;

    fn set(intervals: &[(&str, i64, i64)]) -> IntervalSet {
        IntervalSet::from(
            intervals
                .iter()
                .map(|&(sequence_id, begin, end)| GenomicInterval::new(sequence_id, begin, end))
                .collect::<Vec<_>>(),
        )
    }

    #[rstest]
    fn test_genome_stats_sums_sequences() {
        let inputs = Inputs {
            refs: set(&[("chr1", 10, 20), ("chr2", 50, 60)]),
            queries: set(&[("chr1", 15, 30), ("chr2", 55, 58), ("chr2", 90, 95)]),
            sequence_sizes: HashMap::from([("chr1".to_string(), 100), ("chr2".to_string(), 100)]),
        };

        let stats = genome_stats(inputs, Significance::Enrichment).unwrap();

        assert_eq!(stats.overlap_count, 2);
        assert_eq!(stats.significance, Significance::Enrichment);
        assert!(stats.pvalue > 0.0 && stats.pvalue <= 1.0);
    }

    #[rstest]
    fn test_whole_sequence_windows() {
        let sizes = HashMap::from([("chr1".to_string(), 100)]);
        assert_eq!(
            whole_sequence_windows(&sizes),
            vec![GenomicInterval::new("chr1", 0, 100)]
        );
    }
}
