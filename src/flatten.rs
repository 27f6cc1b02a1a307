//! Metric Flattening
//!
//! Walks a nested summary depth-first and turns every terminal value into a
//! gauge named after its dot-joined key path:
//!
//! ```text
//! {"queries": {"total": 10, "types": {"A": 7}}}  →  pihole.queries.total = 10
//!                                                   pihole.queries.types.A = 7
//! ```
//!
//! Every branch is handled the same way. Values are not checked here; the
//! [`GaugeSink`] decides what it accepts.

use crate::metrics::GaugeSink;
use crate::pihole::types::MetricsSnapshot;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of pushing one snapshot into a sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub emitted: usize,
    pub rejected: usize,
}

/// Terminal values of `metrics` with their full gauge names, in map order
pub fn flatten<'a>(metrics: &'a MetricsSnapshot, prefix: &str) -> Vec<(String, &'a Value)> {
    let mut gauges = Vec::new();
    walk(metrics, prefix, &mut gauges);
    gauges
}

fn walk<'a>(metrics: &'a MetricsSnapshot, prefix: &str, gauges: &mut Vec<(String, &'a Value)>) {
    for (key, value) in metrics {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => walk(nested, &name, gauges),
            leaf => gauges.push((name, leaf)),
        }
    }
}

/// Sends one gauge per terminal value of `snapshot` to `sink`
///
/// A gauge the sink refuses is logged and counted; the rest are still sent.
pub async fn dispatch<S: GaugeSink>(
    snapshot: &MetricsSnapshot,
    prefix: &str,
    sink: &S,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (name, value) in flatten(snapshot, prefix) {
        match sink.gauge(&name, value).await {
            Ok(()) => report.emitted += 1,
            Err(e) => {
                warn!("Failed to send gauge {}: {}", name, e);
                report.rejected += 1;
            }
        }
    }

    debug!(
        "Dispatched {} gauges ({} rejected)",
        report.emitted, report.rejected
    );
    report
}
