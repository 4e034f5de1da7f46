//! Metrics sink boundary.
//!
//! Compiler logic never touches `obs::metrics` directly. All instrumentation
//! flows through `MetricsEvent` and `MetricsSink`.
use crate::obs::metrics::{self, EventReport, bump};
use std::{cell::RefCell, sync::Arc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Arc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent<'a> {
    CompileStart {
        schema: &'a str,
    },
    CompileFinish {
        schema: &'a str,
        ok: bool,
    },
    ComparisonCompiled {
        schema: &'a str,
        op: &'static str,
    },
    FreeTextTerm {
        schema: &'a str,
    },
    FreeTextFieldSkipped {
        schema: &'a str,
        field: &'a str,
    },
    PathCache {
        hit: bool,
    },
    TargetCache {
        hit: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the process-wide counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        let ops = metrics::ops();

        match event {
            MetricsEvent::CompileStart { schema } => {
                bump(&ops.compile_calls);
                metrics::with_schema_mut(schema, |c| {
                    c.compile_calls = c.compile_calls.saturating_add(1);
                });
            }

            MetricsEvent::CompileFinish { schema, ok } => {
                if !ok {
                    bump(&ops.compile_failures);
                    metrics::with_schema_mut(schema, |c| {
                        c.compile_failures = c.compile_failures.saturating_add(1);
                    });
                }
            }

            MetricsEvent::ComparisonCompiled { schema, .. } => {
                bump(&ops.comparisons_compiled);
                metrics::with_schema_mut(schema, |c| {
                    c.comparisons_compiled = c.comparisons_compiled.saturating_add(1);
                });
            }

            MetricsEvent::FreeTextTerm { schema } => {
                bump(&ops.free_text_terms);
                metrics::with_schema_mut(schema, |c| {
                    c.free_text_terms = c.free_text_terms.saturating_add(1);
                });
            }

            MetricsEvent::FreeTextFieldSkipped { schema, .. } => {
                bump(&ops.free_text_skipped);
                metrics::with_schema_mut(schema, |c| {
                    c.free_text_skipped = c.free_text_skipped.saturating_add(1);
                });
            }

            MetricsEvent::PathCache { hit } => {
                if hit {
                    bump(&ops.path_cache_hits);
                } else {
                    bump(&ops.path_cache_misses);
                }
            }

            MetricsEvent::TargetCache { hit } => {
                if hit {
                    bump(&ops.target_cache_hits);
                } else {
                    bump(&ops.target_cache_misses);
                }
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Arc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Arc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// CompileSpan
/// RAII guard that emits start/finish events for one compile call.
/// Finish accounting happens even on unwind; an unfinished span counts as
/// a failure.

pub struct CompileSpan<'a> {
    schema: &'a str,
    ok: bool,
}

impl<'a> CompileSpan<'a> {
    #[must_use]
    pub fn new(schema: &'a str) -> Self {
        record(MetricsEvent::CompileStart { schema });

        Self { schema, ok: false }
    }

    pub const fn succeed(&mut self) {
        self.ok = true;
    }
}

impl Drop for CompileSpan<'_> {
    fn drop(&mut self) {
        record(MetricsEvent::CompileFinish {
            schema: self.schema,
            ok: self.ok,
        });
    }
}
