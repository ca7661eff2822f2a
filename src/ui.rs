pub use crate::features::ui::{
    BatchReport, CSV_HEADER, ReportEntry, WatchSession, display_header_value,
    format_bytes, is_sensitive_header, mask_value, write_batch_banner,
    write_batch_table, write_csv, write_failure_line, write_live_stats, write_ping_failure,
    write_ping_success, write_request_details, write_stop_notice, write_trace,
    write_trace_banner, write_trace_failure, write_watch_banner, write_watch_summary,
};

#[cfg(test)]
pub(crate) use crate::features::ui::parse_csv;
