pub mod csv;
pub mod source;

// Re-export commonly used functions
pub use self::csv::{read_csv, read_csv_from_reader, write_csv, write_csv_to_writer};
pub use source::{CsvSource, MemorySource, TableSource, METADATA_SOURCE_ID};
