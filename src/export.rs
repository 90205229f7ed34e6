//! CSV エクスポートとアップロード先の調停。
pub mod coordinator;
pub mod sink;
pub mod tabular;

pub use coordinator::{CsvReport, ExportCoordinator, ExportOutcome, ExportPhase, UploadOutcome};
pub use sink::{UploadError, UploadSink, UploadedFile};
pub use tabular::{Column, columns_for, escape_field, to_csv};
