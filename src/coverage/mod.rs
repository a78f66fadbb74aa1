//! Coverage reads: request in, mosaicked image out

mod request;
mod reader;

pub use request::{CoverageResult, ReadRequest, SampleDimension};
pub use reader::CoverageReader;
