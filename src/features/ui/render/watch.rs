use super::{write_boxed_title, write_insights};
use crate::common::time::{clock_label, format_duration};
use crate::config::{HttpMethod, WATCH_RECENT_ROWS};
use crate::features::ui::format::{bar, colored_latency, latency_color, rate_color, rule};
use crate::stats::{BoundedHistory, Consistency, RollingTracker, watch_insights};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::time::Duration;

const BAR_WIDTH: usize = 15;
const BLAZING_FAST: Duration = Duration::from_millis(50);

/// What the end-of-session summary needs besides the statistics.
#[derive(Clone, Debug)]
pub struct WatchSession {
    pub url: String,
    pub method: HttpMethod,
    pub elapsed: Duration,
    pub requests: u64,
}

pub fn write_watch_banner<W: Write>(
    out: &mut W,
    url: &str,
    interval: Duration,
    count: u64,
) -> io::Result<()> {
    let count = if count > 0 {
        count.to_string()
    } else {
        "infinite".to_string()
    };
    write_boxed_title(
        out,
        &[
            format!("Watching: {url}"),
            format!("Interval: {}, Count: {count}", format_duration(interval)),
        ],
    )
}

pub fn write_live_stats<W: Write>(
    out: &mut W,
    tracker: &RollingTracker,
    history: &BoundedHistory,
) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    writeln!(out, "\nLive Stats ({} requests)", tracker.total())?;
    let rate = tracker.success_rate();
    writeln!(
        out,
        "   Success Rate:  {} ({}/{})",
        format!("{rate:.1}%").with(rate_color(rate)),
        tracker.successful(),
        tracker.total()
    )?;

    if let (Some(min), Some(max)) = (tracker.min_latency(), tracker.max_latency()) {
        writeln!(out, "   Avg Latency:   {}", colored_latency(tracker.avg_latency()))?;
        writeln!(out, "   Min Latency:   {}", format_duration(min).green())?;
        writeln!(out, "   Max Latency:   {}", format_duration(max).red())?;
        if tracker.total() >= 2 {
            writeln!(out, "   P95 Latency:   {}", format_duration(tracker.percentile(0.95)))?;
        }
    }

    writeln!(out, "\nRecent Checks")?;
    writeln!(
        out,
        "   {:<8}  {:<3}  {:<10}  {:<10}  PERFORMANCE",
        "TIME", "OK", "STATUS", "LATENCY"
    )?;
    writeln!(out, "   {}", rule(65))?;

    let max = tracker.max_latency().unwrap_or_default();
    for entry in history.get_recent(WATCH_RECENT_ROWS) {
        let result = &entry.result;
        let (mark, status) = if result.is_ok() {
            ("✓".green(), result.status.to_string())
        } else {
            ("✗".red(), "Error".to_string())
        };
        writeln!(
            out,
            "   {:<8}  {}    {:<10}  {:<10}  {}",
            clock_label(entry.timestamp),
            mark,
            status,
            format_duration(result.latency),
            latency_bar(result.latency, max)
        )?;
    }

    writeln!(out, "\n{}", "Press Ctrl+C to stop...".blue())?;
    out.flush()
}

fn latency_bar(latency: Duration, max: Duration) -> String {
    if max.is_zero() {
        return format!("[{}]   0%", "·".repeat(BAR_WIDTH));
    }
    let percent = ((latency.as_secs_f64() / max.as_secs_f64()) * 100.0).min(100.0) as u32;
    let fill = if latency < BLAZING_FAST { '★' } else { '█' };
    let drawn = bar(latency, max, BAR_WIDTH, fill, '·');
    let split = drawn
        .char_indices()
        .find(|(_, c)| *c == '·')
        .map_or(drawn.len(), |(index, _)| index);
    let (filled, empty) = drawn.split_at(split);
    let badge = if latency < BLAZING_FAST { " ⚡" } else { "" };
    format!(
        "[{}{empty}] {percent:>3}%{badge}",
        filled.with(latency_color(latency))
    )
}

pub fn write_watch_summary<W: Write>(
    out: &mut W,
    session: &WatchSession,
    tracker: &RollingTracker,
) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    write_boxed_title(out, &["Watch Summary".to_string()])?;

    writeln!(out, "Endpoint")?;
    writeln!(out, "   URL:      {}", session.url)?;
    writeln!(out, "   Method:   {}", session.method)?;
    writeln!(
        out,
        "   Duration: {}",
        format_duration(Duration::from_secs(session.elapsed.as_secs()))
    )?;
    writeln!(out, "   Requests: {}", session.requests)?;
    writeln!(out)?;

    let rate = tracker.success_rate();
    writeln!(out, "Results")?;
    writeln!(
        out,
        "   Success Rate:  {} ({}/{})",
        format!("{rate:.1}%").with(rate_color(rate)),
        tracker.successful(),
        tracker.total()
    )?;
    writeln!(out, "   Successful:    {}", tracker.successful().to_string().green())?;
    writeln!(out, "   Failed:        {}", tracker.failed().to_string().red())?;
    writeln!(out)?;

    if let (Some(min), Some(max)) = (tracker.min_latency(), tracker.max_latency()) {
        writeln!(out, "Performance")?;
        writeln!(out, "   Min Latency:   {}", format_duration(min).cyan())?;
        writeln!(out, "   Max Latency:   {}", format_duration(max).red())?;
        writeln!(out, "   Avg Latency:   {}", colored_latency(tracker.avg_latency()))?;
        if tracker.total() >= 2 {
            for (label, p) in [("P50", 0.50), ("P95", 0.95), ("P99", 0.99)] {
                writeln!(
                    out,
                    "   {label} Latency:   {}",
                    format_duration(tracker.percentile(p))
                )?;
            }
        }
        let std_dev = tracker.std_dev();
        let consistency = Consistency::from_std_dev(std_dev);
        let color = match consistency {
            Consistency::VeryConsistent => Color::Green,
            Consistency::ModerateVariance => Color::Yellow,
            Consistency::HighVariance => Color::Red,
        };
        writeln!(
            out,
            "   Std Dev:       {} {}",
            format_duration(std_dev),
            format!("({})", consistency.label()).with(color)
        )?;
        writeln!(out)?;
    }

    write_insights(
        out,
        &watch_insights(tracker, session.elapsed, session.requests),
    )?;

    let closing = if rate >= 100.0 {
        "✓ All requests successful! API is healthy.".green()
    } else if rate >= 80.0 {
        "⚠ Some failures detected. API may be unstable.".yellow()
    } else {
        "✗ High failure rate. API needs attention!".red()
    };
    writeln!(out, "{closing}")?;
    out.flush()
}
