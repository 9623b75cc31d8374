use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use winsig_model::Diagnostics;

///
/// Shows one tick per finished sequence and routes model messages to the logger
/// without tearing the bar.
///
pub struct ProgressDiagnostics {
    bar: ProgressBar,
}

impl ProgressDiagnostics {
    pub fn new(sequence_count: usize) -> Result<Self> {
        let bar = ProgressBar::new(sequence_count as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
        );
        bar.set_message("Evaluating sequences");
        Ok(ProgressDiagnostics { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Diagnostics for ProgressDiagnostics {
    fn info(&self, message: &str) {
        self.bar.suspend(|| log::info!("{}", message));
    }

    fn warn(&self, message: &str) {
        self.bar.suspend(|| log::warn!("{}", message));
    }

    fn debug(&self, message: &str) {
        self.bar.suspend(|| log::debug!("{}", message));
    }

    fn sequence_finished(&self, sequence_id: &str) {
        self.bar.set_message(sequence_id.to_string());
        self.bar.inc(1);
    }
}
