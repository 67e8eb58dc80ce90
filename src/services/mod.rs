pub mod aggregator;
pub mod report_writer;
pub mod result_parser;

pub use aggregator::{aggregate, build_schema, ColumnSpec, Field, OutputRow, OutputTable};
pub use report_writer::ReportWriter;
pub use result_parser::ResultParser;
