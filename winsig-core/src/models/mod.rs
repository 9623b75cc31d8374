pub mod interval;
pub mod interval_set;

// re-export for cleaner imports
pub use self::interval::GenomicInterval;
pub use self::interval_set::IntervalSet;
