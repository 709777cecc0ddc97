//! Net-log records: wire constants, the record type, and the input reader.

pub mod constants;
pub mod reader;
pub mod record;

pub use constants::{LogEventPhase, LogEventType, LogSourceType};
pub use reader::{Input, ReadError, ReaderEvent};
pub use record::{LogRecord, SourceId};
