use super::{write_boxed_title, write_insights};
use crate::common::time::format_duration;
use crate::features::ui::format::{bar, format_bytes, rule, status_color};
use crate::probe::{TracePhase, TraceResult};
use crate::stats::trace_insights;
use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

const BAR_WIDTH: usize = 20;

fn phase_color(phase: TracePhase) -> Color {
    match phase {
        TracePhase::Dns => Color::Cyan,
        TracePhase::TcpConnect => Color::Green,
        TracePhase::TlsHandshake => Color::Blue,
        TracePhase::ServerProcessing => Color::Yellow,
        TracePhase::ContentTransfer => Color::Green,
    }
}

pub fn write_trace_banner<W: Write>(out: &mut W, url: &str) -> io::Result<()> {
    write_boxed_title(out, &[format!("Trace: {url}")])
}

pub fn write_trace<W: Write>(out: &mut W, trace: &TraceResult) -> io::Result<()> {
    writeln!(out, "Request Timeline")?;

    let phases = trace.phases();
    let longest = phases
        .iter()
        .map(|(_, duration)| *duration)
        .max()
        .unwrap_or_default();

    for (phase, duration) in phases {
        // phases that did not happen (TLS over plain http)
        if duration.is_zero() {
            continue;
        }
        let filled = bar(duration, longest, BAR_WIDTH, '█', '░');
        writeln!(
            out,
            "   {:<18} {}  {:<9} ({:>5.1}%)",
            phase.label(),
            filled.with(phase_color(phase)),
            format_duration(duration),
            trace.share(duration)
        )?;
    }

    writeln!(out, "   {}", rule(50))?;
    writeln!(
        out,
        "   {:<18} {}  {}",
        "Total Time",
        " ".repeat(BAR_WIDTH),
        format_duration(trace.total).cyan()
    )?;
    writeln!(out)?;

    writeln!(out, "Response")?;
    writeln!(
        out,
        "   Status:   {}",
        trace.status_text.as_str().with(status_color(trace.status))
    )?;
    writeln!(out, "   Protocol: {}", trace.protocol)?;
    if trace.size_bytes > 0 {
        writeln!(out, "   Size:     {}", format_bytes(trace.size_bytes))?;
    }
    if let Some(remote) = trace.remote {
        writeln!(out, "   Server:   {remote}")?;
    }
    writeln!(out)?;

    write_insights(out, &trace_insights(trace))
}

pub fn write_trace_failure<W: Write>(out: &mut W, trace: &TraceResult) -> io::Result<()> {
    writeln!(out, "{} Failed to trace request", "✗".red())?;
    if let Some(err) = trace.error() {
        writeln!(out, "  Error: {err}")?;
    }
    Ok(())
}
