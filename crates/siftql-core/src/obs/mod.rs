//! Observability: compile-time telemetry counters and the sink boundary.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, SchemaCounters};
pub use sink::{
    CompileSpan, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
