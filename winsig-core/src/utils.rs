use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::IntervalError;
use crate::models::GenomicInterval;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, IntervalError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|source| IntervalError::FileOpen {
        path: path.display().to_string(),
        source,
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Get a reader for either a gzip'd file, a plain file or stdin (`-`).
///
pub fn get_dynamic_reader_w_stdin(
    file_path_str: &str,
) -> Result<BufReader<Box<dyn Read>>, IntervalError> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

/// True for lines that carry no interval: blanks and `browser`, `track` or `#` headers.
pub fn is_header_line(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with("browser")
        || line.starts_with("track")
        || line.starts_with('#')
}

///
/// Parse one `{sequence_id} {begin} {end}` line. Columns past the third are ignored.
///
/// With `is_closed` the end coordinate is treated as inclusive and shifted by one
/// so that every interval leaves here half open.
///
pub fn parse_interval_line(
    line: &str,
    line_number: usize,
    is_closed: bool,
) -> Result<GenomicInterval, IntervalError> {
    let parse_error = |reason: String| IntervalError::IntervalParse {
        line: line_number,
        reason,
    };

    let mut fields = line.split('\t');
    let (Some(sequence_id), Some(begin), Some(end)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(parse_error(format!(
            "expected {{sequence_id}}\\t{{begin}}\\t{{end}}, got {:?}",
            line
        )));
    };

    let begin: i64 = begin
        .trim()
        .parse()
        .map_err(|_| parse_error(format!("invalid begin position {:?}", begin)))?;
    let mut end: i64 = end
        .trim()
        .parse()
        .map_err(|_| parse_error(format!("invalid end position {:?}", end)))?;

    if is_closed {
        end -= 1;
    }

    if begin >= end {
        return Err(parse_error(format!(
            "begin ({}) must be strictly smaller than end ({})",
            begin, end
        )));
    }
    if begin < 0 || end < 0 {
        return Err(parse_error("interval bounds must be non-negative".to_string()));
    }

    Ok(GenomicInterval::new(sequence_id, begin, end))
}

///
/// Read a two column `{sequence_id} {size}` file into a map.
///
/// Duplicated sequences and negative sizes are rejected.
///
pub fn get_sequence_sizes<T: AsRef<Path>>(path: T) -> Result<HashMap<String, i64>, IntervalError> {
    let reader = get_dynamic_reader(path.as_ref())?;
    read_sequence_sizes(reader)
}

pub fn read_sequence_sizes<R: BufRead>(reader: R) -> Result<HashMap<String, i64>, IntervalError> {
    let mut sizes: HashMap<String, i64> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(IntervalError::SequenceSizeParse {
                line: line_number,
                reason: format!("expected {{sequence_id}}\\t{{size}}, got {:?}", line),
            });
        }

        let size: i64 = parts[1]
            .parse()
            .map_err(|_| IntervalError::SequenceSizeParse {
                line: line_number,
                reason: format!("invalid size {:?}", parts[1]),
            })?;
        if size < 0 {
            return Err(IntervalError::SequenceSizeParse {
                line: line_number,
                reason: format!("size of {} is negative", parts[0]),
            });
        }

        if sizes.insert(parts[0].to_string(), size).is_some() {
            return Err(IntervalError::DuplicateSequence(parts[0].to_string()));
        }
    }

    Ok(sizes)
}

///
/// Tile every sequence with windows of `size` base pairs, one starting every `step`
/// base pairs. The last window of a sequence is truncated at the sequence end.
/// Sequences are visited in name order.
///
pub fn tile_windows(
    sequence_sizes: &HashMap<String, i64>,
    size: i64,
    step: i64,
) -> Result<Vec<GenomicInterval>, IntervalError> {
    if size <= 0 || step <= 0 {
        return Err(IntervalError::InvalidWindowParameters { size, step });
    }

    let mut names: Vec<&String> = sequence_sizes.keys().collect();
    names.sort();

    let mut windows = Vec::new();
    for name in names {
        let length = sequence_sizes[name];
        let mut begin = 0;
        while begin < length {
            windows.push(GenomicInterval::new(
                name.as_str(),
                begin,
                (begin + size).min(length),
            ));
            if begin + size >= length {
                break;
            }
            begin += step;
        }
    }

    Ok(windows)
}
