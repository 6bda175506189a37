pub mod pipeline;

pub use pipeline::{IngestReport, IngestService, StageReport};
