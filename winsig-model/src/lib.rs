//! Significance of reference/query interval overlap, window by window.
//!
//! The null model is a two-state Markov chain walking the sequence base by base,
//! inside or outside a query interval. For every window the crate computes the
//! distribution of the number of reference intervals hit by queries under that model,
//! alongside the observed count.
//!
//! Windows may overlap or nest. The [Algorithm::Fast] path cuts them into sections at
//! every window boundary, evaluates each section once and joins sections back into
//! windows; [Algorithm::Naive] evaluates every window from scratch.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use winsig_core::models::GenomicInterval;
//! use winsig_model::{Algorithm, LogDiagnostics, Significance, WindowModel, WindowStats};
//!
//! let sizes = HashMap::from([("chr1".to_string(), 10_000)]);
//! let windows = vec![GenomicInterval::new("chr1", 0, 5_000)];
//! let refs = vec![GenomicInterval::new("chr1", 1_000, 1_100)];
//! let queries = vec![GenomicInterval::new("chr1", 1_050, 1_060)];
//!
//! let model = WindowModel::new(windows, refs, queries, &sizes, Algorithm::Fast);
//! for result in model.run(&LogDiagnostics).unwrap() {
//!     let stats = WindowStats::new(&result, Significance::Combined).unwrap();
//!     println!("{}\t{}", result.window, stats.pvalue);
//! }
//! ```

pub mod diagnostics;
pub mod dp;
pub mod errors;
pub mod logspace;
pub mod markov_chain;
pub mod matrix;
pub mod merge;
pub mod models;
pub mod sections;
pub mod stats;
pub mod window_model;

// re-exports
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use errors::ModelError;
pub use markov_chain::MarkovChain;
pub use models::{Algorithm, ProbabilityTensor, Significance, WindowResult};
pub use stats::{GenomeStats, WindowStats};
pub use window_model::WindowModel;
