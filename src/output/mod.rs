//! Segments output

mod csv_sink;

pub use csv_sink::{read_rows, write_routes, Columns, CsvSink, SegmentRow};
