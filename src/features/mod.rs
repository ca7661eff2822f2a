pub mod app;
pub mod batch;
pub mod probe;
pub mod stats;
pub mod ui;
