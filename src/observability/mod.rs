//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Executor and receiver produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Prometheus scrape endpoint (receiver binary, opt-in)
//! ```
//!
//! Recording a metric without an installed recorder is a no-op, so library
//! users pay nothing unless they install one.

pub mod logging;
pub mod metrics;
