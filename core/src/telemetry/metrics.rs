use std::cell::Cell;

/// Per-run counters of captures that loaded and captures that failed.
///
/// Runs are single-threaded, so plain cells are enough.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    processed: Cell<usize>,
    errors: Cell<usize>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&self) {
        self.processed.set(self.processed.get() + 1);
    }

    pub fn record_error(&self) {
        self.errors.set(self.errors.get() + 1);
    }

    /// `(processed, errors)`.
    pub fn snapshot(&self) -> (usize, usize) {
        (self.processed.get(), self.errors.get())
    }
}
