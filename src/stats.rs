pub use crate::features::stats::{
    BoundedHistory, Consistency, HistoryEntry, Insight, LatencyClass, RollingTracker, Tone,
    latency_class, trace_insights, watch_insights,
};
