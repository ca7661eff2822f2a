pub use crate::features::app::{
    AppError, Outcome, OutputMode, build_request, emit_batch, run, run_batch_command, run_ping,
    run_trace, run_watch,
};
