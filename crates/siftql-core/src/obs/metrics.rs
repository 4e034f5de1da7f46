use dashmap::DashMap;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    sync::{
        LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// Counters
/// Process-wide operation counters, safe to bump from any worker thread.
///

#[derive(Default)]
pub(crate) struct Counters {
    pub(crate) compile_calls: AtomicU64,
    pub(crate) compile_failures: AtomicU64,
    pub(crate) comparisons_compiled: AtomicU64,
    pub(crate) free_text_terms: AtomicU64,
    pub(crate) free_text_skipped: AtomicU64,
    pub(crate) path_cache_hits: AtomicU64,
    pub(crate) path_cache_misses: AtomicU64,
    pub(crate) target_cache_hits: AtomicU64,
    pub(crate) target_cache_misses: AtomicU64,
}

static OPS: LazyLock<Counters> = LazyLock::new(Counters::default);
static SCHEMAS: LazyLock<DashMap<String, SchemaCounters>> = LazyLock::new(DashMap::new);

///
/// EventOps
/// Snapshot of the global counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Compile entrypoints
    pub compile_calls: u64,
    pub compile_failures: u64,

    // Lowering
    pub comparisons_compiled: u64,
    pub free_text_terms: u64,
    pub free_text_skipped: u64,

    // Caches
    pub path_cache_hits: u64,
    pub path_cache_misses: u64,
    pub target_cache_hits: u64,
    pub target_cache_misses: u64,
}

///
/// SchemaCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SchemaCounters {
    pub compile_calls: u64,
    pub compile_failures: u64,
    pub comparisons_compiled: u64,
    pub free_text_terms: u64,
    pub free_text_skipped: u64,
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub schemas: BTreeMap<String, SchemaCounters>,
}

pub(crate) fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn ops() -> &'static Counters {
    &OPS
}

pub(crate) fn with_schema_mut(schema: &str, f: impl FnOnce(&mut SchemaCounters)) {
    if let Some(mut entry) = SCHEMAS.get_mut(schema) {
        f(&mut entry);
        return;
    }
    f(&mut SCHEMAS.entry(schema.to_string()).or_default());
}

pub(crate) fn report() -> EventReport {
    let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
    let ops = EventOps {
        compile_calls: load(&OPS.compile_calls),
        compile_failures: load(&OPS.compile_failures),
        comparisons_compiled: load(&OPS.comparisons_compiled),
        free_text_terms: load(&OPS.free_text_terms),
        free_text_skipped: load(&OPS.free_text_skipped),
        path_cache_hits: load(&OPS.path_cache_hits),
        path_cache_misses: load(&OPS.path_cache_misses),
        target_cache_hits: load(&OPS.target_cache_hits),
        target_cache_misses: load(&OPS.target_cache_misses),
    };
    let schemas = SCHEMAS
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();

    EventReport { ops, schemas }
}

pub(crate) fn reset_all() {
    for counter in [
        &OPS.compile_calls,
        &OPS.compile_failures,
        &OPS.comparisons_compiled,
        &OPS.free_text_terms,
        &OPS.free_text_skipped,
        &OPS.path_cache_hits,
        &OPS.path_cache_misses,
        &OPS.target_cache_hits,
        &OPS.target_cache_misses,
    ] {
        counter.store(0, Ordering::Relaxed);
    }
    SCHEMAS.clear();
}
