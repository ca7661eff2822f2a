pub use crate::features::batch::{
    BatchError, BatchOptions, BatchResult, BatchSummary, StopReason, run_batch, run_batch_with,
};
