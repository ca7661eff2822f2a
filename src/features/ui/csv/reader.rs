//! Test-side reader for the CSV report.

use super::CSV_HEADER;
use crate::features::ui::report::ReportEntry;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub(crate) enum CsvError {
    #[error("missing or unexpected header row")]
    Header,
    #[error("line {line}: expected 9 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid {field} value '{value}'")]
    Value {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: unterminated quoted field")]
    Unterminated { line: usize },
}

/// Reads back what [`super::write_csv`] produced. Quoted fields may span lines.
pub(crate) fn parse_csv(text: &str) -> Result<Vec<ReportEntry>, CsvError> {
    let records = split_records(text)?;
    let mut iter = records.into_iter();
    match iter.next() {
        Some((_, header)) if header.join(",") == CSV_HEADER => {}
        _ => return Err(CsvError::Header),
    }

    iter.map(|(line, fields)| entry_from_fields(line, fields))
        .collect()
}

fn entry_from_fields(line: usize, fields: Vec<String>) -> Result<ReportEntry, CsvError> {
    let found = fields.len();
    let Ok([name, url, method, status, expected, latency, size, success, error]) =
        <[String; 9]>::try_from(fields)
    else {
        return Err(CsvError::FieldCount { line, found });
    };

    fn number<T: std::str::FromStr>(
        line: usize,
        field: &'static str,
        value: &str,
    ) -> Result<T, CsvError> {
        value.parse().map_err(|_| CsvError::Value {
            line,
            field,
            value: value.to_string(),
        })
    }

    Ok(ReportEntry {
        status: number(line, "status", &status)?,
        expected_status: number(line, "expected_status", &expected)?,
        latency_ms: number(line, "latency_ms", &latency)?,
        size_bytes: number(line, "size_bytes", &size)?,
        success: number(line, "success", &success)?,
        error: (!error.is_empty()).then_some(error),
        name,
        url,
        method,
    })
}

fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>, CsvError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::Unterminated { line: record_line });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}
