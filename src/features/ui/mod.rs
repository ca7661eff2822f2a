mod csv;
mod format;
mod render;
mod report;

pub use csv::{CSV_HEADER, write_csv};
#[cfg(test)]
pub(crate) use csv::parse_csv;
pub use format::{display_header_value, format_bytes, is_sensitive_header, mask_value};
pub use render::{
    WatchSession, write_batch_banner, write_batch_table, write_failure_line, write_live_stats,
    write_ping_failure, write_ping_success, write_request_details, write_stop_notice,
    write_trace, write_trace_banner, write_trace_failure, write_watch_banner, write_watch_summary,
};
pub use report::{BatchReport, ReportEntry};
