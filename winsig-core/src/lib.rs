//! # winsig-core
//!
//! Genomic interval models shared by the winsig crates: the [models::GenomicInterval]
//! type, [models::IntervalSet] loading and normalization, sequence size files, window
//! tiling and plain overlap counting.
//!
//! ```rust,no_run
//! use winsig_core::models::IntervalSet;
//! use winsig_core::utils::get_sequence_sizes;
//!
//! let sizes = get_sequence_sizes("hg38.chrom.sizes").unwrap();
//! let names: Vec<&String> = sizes.keys().collect();
//!
//! let mut refs = IntervalSet::try_from("genes.bed").unwrap();
//! refs.normalize(&names);
//! ```
pub mod errors;
pub mod models;
pub mod overlaps;
pub mod utils;
