mod batch;
mod ping;
mod trace;
mod watch;

pub use batch::{write_batch_banner, write_batch_table, write_failure_line, write_stop_notice};
pub use ping::{write_ping_failure, write_ping_success, write_request_details};
pub use trace::{write_trace, write_trace_banner, write_trace_failure};
pub use watch::{WatchSession, write_live_stats, write_watch_banner, write_watch_summary};

use crate::stats::{Insight, Tone};
use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

fn tone_style(tone: Tone) -> (&'static str, Color) {
    match tone {
        Tone::Good => ("✓", Color::Green),
        Tone::Notable => ("⚡", Color::Cyan),
        Tone::Warning => ("⚠", Color::Yellow),
        Tone::Critical => ("✗", Color::Red),
        Tone::Neutral => ("•", Color::Reset),
    }
}

fn write_insights<W: Write>(out: &mut W, insights: &[Insight]) -> io::Result<()> {
    writeln!(out, "Insights")?;
    for insight in insights {
        let (icon, color) = tone_style(insight.tone);
        writeln!(out, "   {}", format!("{icon} {}", insight.text).with(color))?;
    }
    writeln!(out)
}

fn write_boxed_title<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    const WIDTH: usize = 69;
    writeln!(out)?;
    writeln!(out, "┌{}┐", "─".repeat(WIDTH))?;
    for line in lines {
        let pad = WIDTH.saturating_sub(line.chars().count() + 1);
        writeln!(out, "│ {line}{}│", " ".repeat(pad))?;
    }
    writeln!(out, "└{}┘", "─".repeat(WIDTH))
}
