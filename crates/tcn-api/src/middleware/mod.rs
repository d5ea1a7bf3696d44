//! # Middleware Stack
//!
//! - [`metrics`]: request counters and latency histograms through the
//!   `metrics` facade, plus per-operation outcome counters.
//!
//! Tracing and CORS come from `tower-http` and are wired in `app()`.

pub mod metrics;
