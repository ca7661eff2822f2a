mod history;
mod insights;
mod tracker;

pub use history::{BoundedHistory, HistoryEntry};
pub use insights::{
    Consistency, Insight, LatencyClass, Tone, latency_class, trace_insights, watch_insights,
};
pub use tracker::RollingTracker;
