//! sheetflow — format-inferring, size-adaptive CSV ⇄ workbook conversion.
//!
//! The library is organized as a pipeline of independent pieces:
//!
//! - [`sniff`]: byte-level encoding and delimiter detection, with a
//!   confidence-gated fallback probe for legacy encodings.
//! - [`infer`]: per-column type inference (integer, float, date, text)
//!   over whole columns, never single cells.
//! - [`convert`]: the conversion engines. [`convert::StandardConverter`]
//!   loads a file whole; [`convert::ChunkedConverter`] streams fixed-size
//!   row batches for large inputs; [`convert::ReverseConverter`] goes
//!   workbook → CSV. [`convert::ConversionPlanner`] picks between the
//!   forward paths by file size.
//! - [`validate`]: read-only checks (structure, security, performance,
//!   output conflicts) that never invoke a converter.
//! - [`batch`]: the sequential orchestrator tying it together with
//!   per-file fault isolation.
//!
//! # Example
//!
//! ```no_run
//! use sheetflow::{BatchOrchestrator, CancellationToken, ConversionRequest, OutputFormat};
//!
//! let request = ConversionRequest::new(
//!     vec!["sales.csv".into()],
//!     OutputFormat::Workbook,
//!     "out".into(),
//! );
//! let orchestrator = BatchOrchestrator::new();
//! let report = orchestrator.validate_request(&request);
//! if report.is_valid {
//!     let summary = orchestrator
//!         .convert_batch(&request, None, &CancellationToken::new())
//!         .unwrap();
//!     println!("{}/{} converted", summary.succeeded, summary.total);
//! }
//! ```

pub mod batch;
pub mod convert;
pub mod error;
pub mod infer;
pub mod progress;
pub mod sniff;
pub mod table;
pub mod validate;

pub use batch::{
    BatchOrchestrator, BatchSummary, ConversionRequest, ConversionResult, OutputFormat,
};
pub use convert::{
    ChunkedConverter, ConversionPlanner, ConvertConfig, ReverseConverter, StandardConverter,
    Strategy, StyleOptions,
};
pub use error::{Result, SheetflowError};
pub use infer::{ColumnType, TypeInferencer, Value};
pub use progress::{CancellationToken, ProgressFn};
pub use sniff::{DetectedFormat, FormatSniffer, SniffConfig};
pub use table::DataTable;
pub use validate::{
    ConflictValidator, CsvStructureValidator, PerformanceEstimate, PerformanceEstimator,
    PerformanceLevel, SecurityValidator, ValidationReport, WorkbookStructureValidator,
};

/// Convert a batch with default configuration.
pub fn convert_batch(
    request: &ConversionRequest,
    cancel: &CancellationToken,
) -> Result<BatchSummary> {
    BatchOrchestrator::new().convert_batch(request, None, cancel)
}

/// Validate a request with default configuration, without converting.
pub fn validate_request(request: &ConversionRequest) -> ValidationReport {
    BatchOrchestrator::new().validate_request(request)
}
