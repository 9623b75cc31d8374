use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use winsig_core::models::IntervalSet;
use winsig_core::utils::get_sequence_sizes;

/// Reference, query and sequence sizes shared by every subcommand.
pub struct Inputs {
    pub refs: IntervalSet,
    pub queries: IntervalSet,
    pub sequence_sizes: HashMap<String, i64>,
}

///
/// Load and normalize the reference and query files. Either one, but not both, may
/// be `-` to read from stdin.
///
/// Both sets are restricted to the sequences of the sizes file, merged where
/// they overlap or touch, and stripped of empty intervals.
///
pub fn load_inputs(
    ref_path: &str,
    query_path: &str,
    sizes_path: &Path,
    is_closed: bool,
) -> Result<Inputs> {
    if ref_path == "-" && query_path == "-" {
        anyhow::bail!("Only one of --ref and --query can be read from stdin");
    }

    let sequence_sizes = get_sequence_sizes(sizes_path)
        .with_context(|| format!("Failed to load sequence sizes from {}", sizes_path.display()))?;
    let sequence_ids: Vec<&String> = sequence_sizes.keys().collect();

    let mut refs = IntervalSet::from_path_or_stdin(ref_path, is_closed)
        .with_context(|| format!("Failed to load reference intervals from {}", ref_path))?;
    let mut queries = IntervalSet::from_path_or_stdin(query_path, is_closed)
        .with_context(|| format!("Failed to load query intervals from {}", query_path))?;

    let (raw_refs, raw_queries) = (refs.len(), queries.len());
    refs.normalize(&sequence_ids);
    queries.normalize(&sequence_ids);

    log::info!(
        "Loaded {} reference intervals ({} after normalization, {} bp) and {} query intervals ({} after normalization, {} bp) on {} sequences",
        raw_refs,
        refs.len(),
        refs.total_width(),
        raw_queries,
        queries.len(),
        queries.total_width(),
        sequence_sizes.len()
    );

    Ok(Inputs {
        refs,
        queries,
        sequence_sizes,
    })
}

pub fn load_inputs_from_matches(matches: &ArgMatches) -> Result<Inputs> {
    let ref_path = matches
        .get_one::<String>("ref")
        .context("--ref is required")?;
    let query_path = matches
        .get_one::<String>("query")
        .context("--query is required")?;
    let sizes_path = matches
        .get_one::<String>("chrom-sizes")
        .context("--chrom-sizes is required")?;

    load_inputs(
        ref_path,
        query_path,
        Path::new(sizes_path),
        matches.get_flag("closed"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn path(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[rstest]
    fn test_load_inputs_normalizes() {
        let refs = write_file("chr1\t10\t20\nchr1\t20\t30\nchrUn\t0\t5\n");
        let queries = write_file("track name=q\nchr1\t15\t25\n");
        let sizes = write_file("chr1\t100\n");

        let inputs = load_inputs(path(&refs), path(&queries), sizes.path(), false).unwrap();

        assert_eq!(inputs.refs.len(), 1);
        assert_eq!(inputs.refs.intervals[0].begin, 10);
        assert_eq!(inputs.refs.intervals[0].end, 30);
        assert_eq!(inputs.queries.len(), 1);
        assert_eq!(inputs.sequence_sizes["chr1"], 100);
    }

    #[rstest]
    fn test_load_inputs_reports_bad_file() {
        let refs = write_file("chr1\t20\t10\n");
        let queries = write_file("chr1\t15\t25\n");
        let sizes = write_file("chr1\t100\n");

        let err = load_inputs(path(&refs), path(&queries), sizes.path(), false)
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("reference intervals"));
    }

    #[rstest]
    fn test_load_inputs_single_stdin_only() {
        let sizes = write_file("chr1\t100\n");

        let err = load_inputs("-", "-", sizes.path(), false).err().unwrap();
        assert!(err.to_string().contains("stdin"));
    }
}
