use super::report::ReportEntry;

pub const CSV_HEADER: &str = "name,url,method,status,expected_status,latency_ms,size_bytes,success,error";

pub fn write_csv(entries: &[ReportEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        let row = [
            escape(&entry.name),
            escape(&entry.url),
            escape(&entry.method),
            entry.status.to_string(),
            entry.expected_status.to_string(),
            entry.latency_ms.to_string(),
            entry.size_bytes.to_string(),
            entry.success.to_string(),
            escape(entry.error.as_deref().unwrap_or("")),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod reader;
#[cfg(test)]
pub(crate) use reader::{CsvError, parse_csv};
