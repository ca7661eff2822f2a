mod common;
mod features;

pub use common::time::{Clock, Sleeper, SystemClock, ThreadSleeper};

pub mod app;
pub mod batch;
pub mod config;
pub mod data_model;
pub mod loader;
pub mod logging;
pub mod probe;
pub mod probe_engine;
pub mod runtime;
pub mod settings;
pub mod stats;
pub mod ui;
