use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::IntervalError;
use crate::models::GenomicInterval;
use crate::utils::{get_dynamic_reader, get_dynamic_reader_w_stdin, is_header_line, parse_interval_line};

///
/// IntervalSet struct, the in-memory representation of a bed-like interval file.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalSet {
    pub intervals: Vec<GenomicInterval>,
    pub path: Option<PathBuf>,
}

impl IntervalSet {
    ///
    /// Load an interval file, optionally treating the end coordinate as inclusive.
    ///
    /// # Arguments:
    /// - path: path to the (optionally gzip'd) file on disk.
    /// - is_closed: whether the file uses closed `[begin, end]` coordinates.
    pub fn from_path(path: &Path, is_closed: bool) -> Result<Self, IntervalError> {
        let reader = get_dynamic_reader(path)?;
        let mut set = IntervalSet::from_reader(reader, is_closed)?;

        if set.is_empty() {
            return Err(IntervalError::EmptyIntervalSet(path.display().to_string()));
        }

        set.path = Some(path.to_owned());
        Ok(set)
    }

    ///
    /// Load an interval file, or stdin when `file_path_str` is `-`.
    ///
    pub fn from_path_or_stdin(file_path_str: &str, is_closed: bool) -> Result<Self, IntervalError> {
        let reader = get_dynamic_reader_w_stdin(file_path_str)?;
        let mut set = IntervalSet::from_reader(reader, is_closed)?;

        if set.is_empty() {
            return Err(IntervalError::EmptyIntervalSet(file_path_str.to_string()));
        }

        if file_path_str != "-" {
            set.path = Some(PathBuf::from(file_path_str));
        }
        Ok(set)
    }

    pub fn from_reader<R: BufRead>(reader: R, is_closed: bool) -> Result<Self, IntervalError> {
        let mut intervals = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if is_header_line(&line) {
                continue;
            }
            intervals.push(parse_interval_line(&line, idx + 1, is_closed)?);
        }

        Ok(IntervalSet {
            intervals,
            path: None,
        })
    }

    pub fn sort(&mut self) {
        self.intervals.sort();
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenomicInterval> {
        self.intervals.iter()
    }

    ///
    /// Keep only intervals whose sequence is one of `sequence_ids`.
    ///
    pub fn filter_by_sequences<S: AsRef<str>>(&mut self, sequence_ids: &[S]) {
        let keep: HashSet<&str> = sequence_ids.iter().map(|s| s.as_ref()).collect();
        self.intervals
            .retain(|interval| keep.contains(interval.sequence_id.as_str()));
    }

    ///
    /// Sort and merge every group of overlapping or touching intervals into one.
    ///
    /// Touching intervals (`a.end == b.begin`) are merged too: the null model
    /// needs a gap between two consecutive query intervals.
    ///
    pub fn merge_non_disjoint(&mut self) {
        if self.intervals.is_empty() {
            return;
        }
        self.sort();

        let mut merged: Vec<GenomicInterval> = Vec::with_capacity(self.intervals.len());
        for interval in self.intervals.drain(..) {
            match merged.last_mut() {
                Some(current)
                    if current.sequence_id == interval.sequence_id
                        && interval.begin <= current.end =>
                {
                    current.end = current.end.max(interval.end);
                }
                _ => merged.push(interval),
            }
        }

        self.intervals = merged;
    }

    pub fn remove_empty(&mut self) {
        self.intervals.retain(|interval| !interval.is_empty());
    }

    ///
    /// The full normalization pass applied before intervals reach the model:
    /// restrict to known sequences, merge, drop empties.
    ///
    pub fn normalize<S: AsRef<str>>(&mut self, sequence_ids: &[S]) {
        self.filter_by_sequences(sequence_ids);
        self.merge_non_disjoint();
        self.remove_empty();
    }

    ///
    /// Sorted, deduplicated names of the sequences present in the set.
    ///
    pub fn iter_sequences(&self) -> impl Iterator<Item = &String> {
        let mut unique: Vec<&String> = self
            .intervals
            .iter()
            .map(|interval| &interval.sequence_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        unique.sort();
        unique.into_iter()
    }

    pub fn iter_sequence_intervals<'a>(
        &'a self,
        sequence_id: &'a str,
    ) -> impl Iterator<Item = &'a GenomicInterval> {
        self.intervals
            .iter()
            .filter(move |interval| interval.sequence_id == sequence_id)
    }

    /// Total number of base pairs covered, assuming the set is merged.
    pub fn total_width(&self) -> i64 {
        self.intervals.iter().map(|interval| interval.width()).sum()
    }
}

impl From<Vec<GenomicInterval>> for IntervalSet {
    fn from(intervals: Vec<GenomicInterval>) -> Self {
        IntervalSet {
            intervals,
            path: None,
        }
    }
}

impl TryFrom<&Path> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        IntervalSet::from_path(value, false)
    }
}

impl TryFrom<&str> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        IntervalSet::try_from(Path::new(value))
    }
}

impl TryFrom<String> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IntervalSet::try_from(Path::new(&value))
    }
}

impl TryFrom<PathBuf> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        IntervalSet::try_from(value.as_path())
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a GenomicInterval;
    type IntoIter = std::slice::Iter<'a, GenomicInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
