//! Size-based selection of the conversion strategy.

use std::path::Path;

use crate::error::{Result, SheetflowError};

/// Default threshold above which the chunked path is used: 50 MiB.
pub const DEFAULT_CHUNK_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;

/// Which conversion path to take for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Load the whole table into memory.
    Standard,
    /// Stream fixed-size row batches, bounding peak memory.
    Chunked,
}

/// Picks a strategy from the input file size.
#[derive(Debug, Clone)]
pub struct ConversionPlanner {
    threshold_bytes: u64,
}

impl ConversionPlanner {
    /// Create a planner; the threshold is caller-supplied configuration,
    /// not a constant, so it can be tuned for available memory.
    pub fn new(threshold_bytes: u64) -> Result<Self> {
        if threshold_bytes == 0 {
            return Err(SheetflowError::Config(
                "chunk threshold must be greater than zero bytes".to_string(),
            ));
        }
        Ok(Self { threshold_bytes })
    }

    /// Decide the strategy for the file at `path`.
    pub fn plan(&self, path: impl AsRef<Path>) -> Result<Strategy> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetflowError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let metadata = std::fs::metadata(path).map_err(|e| SheetflowError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if metadata.len() > self.threshold_bytes {
            Ok(Strategy::Chunked)
        } else {
            Ok(Strategy::Standard)
        }
    }
}

impl Default for ConversionPlanner {
    fn default() -> Self {
        Self {
            threshold_bytes: DEFAULT_CHUNK_THRESHOLD_BYTES,
        }
    }
}
