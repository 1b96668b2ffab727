//! Row cap state for one render invocation.

/// Tracks the configured row cap and whether it was hit. Created fresh per
/// top-level render and threaded through nested steps (e.g. a dictionary
/// delegating to the table renderer); never reused across invocations.
#[derive(Debug)]
pub struct RowLimit {
    max_rows: usize,
    exceeded: bool,
}

impl RowLimit {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows, exceeded: false }
    }

    /// True once `emitted` rows fill the cap.
    pub fn should_stop(&self, emitted: usize) -> bool {
        emitted >= self.max_rows
    }

    /// One-shot flag: rendering stops here, output built so far is kept.
    pub fn mark_exceeded(&mut self) {
        self.exceeded = true;
    }

    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }
}
