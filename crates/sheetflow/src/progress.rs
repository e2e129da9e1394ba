//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress callback: `(units_done, total_if_known)`.
///
/// Batch-level calls report `(files_done, Some(total_files))`; chunk-level
/// calls report `(rows_processed, None)` because the total row count is
/// unknown until EOF. Invoked synchronously from the conversion worker:
/// callers must not block inside it.
pub type ProgressFn<'a> = dyn FnMut(u64, Option<u64>) + 'a;

/// Cooperative cancellation flag shared between a caller and a running batch.
///
/// Checked between files and between chunks, never mid-row, so cancellation
/// latency is bounded by one chunk's processing time. Partially written
/// output files are left on disk; cleanup is the caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shared_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
