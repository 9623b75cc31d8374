//! Where the model reports what it is doing.
//!
//! The model never logs directly: callers hand in a [Diagnostics] sink, so the same
//! run can feed the `log` facade, a progress bar or a test recorder.

use std::sync::Mutex;

use log::Level;

pub trait Diagnostics: Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn debug(&self, message: &str);

    /// Called once per sequence after all of its windows are evaluated.
    fn sequence_finished(&self, _sequence_id: &str) {}
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    messages: Mutex<Vec<(Level, String)>>,
    finished: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    fn record(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| {
                messages
                    .iter()
                    .filter(|(l, _)| *l == level)
                    .map(|(_, message)| message.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sequences reported finished, in sorted order.
    pub fn finished_sequences(&self) -> Vec<String> {
        let mut finished = self
            .finished
            .lock()
            .map(|finished| finished.clone())
            .unwrap_or_default();
        finished.sort();
        finished
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn debug(&self, message: &str) {
        self.record(Level::Debug, message);
    }

    fn sequence_finished(&self, sequence_id: &str) {
        if let Ok(mut finished) = self.finished.lock() {
            finished.push(sequence_id.to_string());
        }
    }
}
