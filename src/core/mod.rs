//! Core modules for blinkear

pub mod ear;
pub mod tracker;
pub mod analyzer;
pub mod api;

pub use ear::compute_ear;
pub use tracker::BlinkTracker;
pub use analyzer::FrameAnalyzer;
pub use api::{create_router, run_server};
