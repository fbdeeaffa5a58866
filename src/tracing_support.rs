//! Tracing support for algorithm progress and timing.
//!
//! With the `tracing` feature enabled, algorithms open an `info_span!` at
//! every entry point and emit `debug!` events for per-pass progress, and
//! [`init_tracing`] installs a formatting subscriber together with a layer
//! that accumulates the time spent inside each span.  With the feature disabled
//! the same macros compile to nothing.

#[cfg(feature = "tracing")]
mod enabled {
    use std::{
        cell::RefCell,
        collections::BTreeMap,
        sync::Once,
        time::{Duration, Instant},
    };

    use tracing_subscriber::{
        EnvFilter, Layer, Registry, fmt, layer::Context, layer::SubscriberExt,
        registry::LookupSpan, util::SubscriberInitExt,
    };

    /// Busy time and number of closed spans for one span name.
    #[derive(Clone, Copy, Debug, Default)]
    struct SpanTotals {
        busy: Duration,
        closed: usize,
    }

    thread_local! {
        static SPAN_TOTALS: RefCell<BTreeMap<&'static str, SpanTotals>> =
            const { RefCell::new(BTreeMap::new()) };
    }

    /// Per-span stopwatch kept in the span's extensions.  Runs only while
    /// the span is entered.
    struct Stopwatch {
        running_since: Option<Instant>,
        busy: Duration,
    }

    /// Sums the busy time of every span by name when the span closes.
    struct BusyTimeLayer;

    impl<S> Layer<S> for BusyTimeLayer
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_enter(&self, id: &tracing::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else { return };
            let mut extensions = span.extensions_mut();
            match extensions.get_mut::<Stopwatch>() {
                Some(stopwatch) => stopwatch.running_since = Some(Instant::now()),
                None => extensions.insert(Stopwatch {
                    running_since: Some(Instant::now()),
                    busy: Duration::ZERO,
                }),
            }
        }

        fn on_exit(&self, id: &tracing::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else { return };
            if let Some(stopwatch) = span.extensions_mut().get_mut::<Stopwatch>() {
                if let Some(since) = stopwatch.running_since.take() {
                    stopwatch.busy += since.elapsed();
                }
            }
        }

        fn on_close(&self, id: tracing::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else { return };
            let busy = span
                .extensions()
                .get::<Stopwatch>()
                .map_or(Duration::ZERO, |stopwatch| stopwatch.busy);
            SPAN_TOTALS.with(|totals| {
                let mut totals = totals.borrow_mut();
                let entry = totals.entry(span.metadata().name()).or_default();
                entry.busy += busy;
                entry.closed += 1;
            });
        }
    }

    /// Installs the global subscriber.  The log level comes from `RUST_LOG`
    /// and defaults to `warn`.  Safe to call more than once.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            let _ = Registry::default()
                .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
                .with(BusyTimeLayer)
                .try_init();
        });
    }

    /// Returns the accumulated `(busy time, count)` per span name recorded
    /// on the current thread, longest first.
    pub fn span_timings() -> Vec<(&'static str, Duration, usize)> {
        SPAN_TOTALS.with(|totals| {
            let mut entries: Vec<_> = totals
                .borrow()
                .iter()
                .map(|(name, totals)| (*name, totals.busy, totals.closed))
                .collect();
            entries.sort_by(|a, b| b.1.cmp(&a.1));
            entries
        })
    }

    pub fn dump_span_timings() {
        eprintln!("span timings (desc):");
        for (name, duration, count) in span_timings() {
            eprintln!("  {name}: {:?} ({}x)", duration, count);
        }
    }

    pub fn reset_span_timings() {
        init_tracing();
        SPAN_TOTALS.with(|totals| totals.borrow_mut().clear());
    }

    pub use tracing::{debug, info_span};
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    use std::time::Duration;

    pub fn init_tracing() {}

    pub fn span_timings() -> Vec<(&'static str, Duration, usize)> {
        Vec::new()
    }

    pub fn dump_span_timings() {}

    pub fn reset_span_timings() {}

    macro_rules! info_span {
        ($name:expr) => {{ $crate::tracing_support::NoOpSpan }};
        ($name:expr, $($fields:tt)*) => {{ $crate::tracing_support::NoOpSpan }};
    }

    macro_rules! debug {
        ($($args:tt)*) => {{}};
    }

    pub(crate) use {debug, info_span};

    pub struct NoOpSpan;

    impl NoOpSpan {
        pub fn entered(self) -> NoOpSpanGuard {
            NoOpSpanGuard
        }
    }

    pub struct NoOpSpanGuard;
}

#[cfg(feature = "tracing")]
pub use enabled::*;

#[cfg(not(feature = "tracing"))]
pub use disabled::*;

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use super::*;

    #[test]
    fn test_spans_are_timed() {
        reset_span_timings();
        {
            let _span = info_span!("timed_section").entered();
        }
        let timings = span_timings();
        assert!(
            timings
                .iter()
                .any(|(name, _, count)| *name == "timed_section" && *count == 1),
            "{timings:?}"
        );
    }

    #[test]
    fn test_reentered_span_counts_once() {
        reset_span_timings();
        let span = info_span!("reentered_section");
        for _ in 0..3 {
            let _guard = span.enter();
        }
        drop(span);
        let timings = span_timings();
        assert!(
            timings
                .iter()
                .any(|(name, _, count)| *name == "reentered_section" && *count == 1),
            "{timings:?}"
        );
    }
}
