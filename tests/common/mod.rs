//! Shared test helpers

#![allow(dead_code)]

use pihole_statsd_exporter::error::{ExporterError, Result};
use pihole_statsd_exporter::metrics::GaugeSink;
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Sink that records every gauge it accepts
///
/// Mirrors the StatsD sink's rule of refusing values that are neither
/// numbers nor booleans.
#[derive(Default)]
pub struct RecordingSink {
    gauges: Mutex<Vec<(String, Value)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gauges(&self) -> Vec<(String, Value)> {
        self.gauges.lock().unwrap().clone()
    }
}

impl GaugeSink for RecordingSink {
    async fn gauge(&self, name: &str, value: &Value) -> Result<()> {
        if !(value.is_number() || value.is_boolean()) {
            return Err(ExporterError::Metric(format!("{name} is not numeric")));
        }
        self.gauges
            .lock()
            .unwrap()
            .push((name.to_string(), value.clone()));
        Ok(())
    }
}

/// Unwraps a `json!` object literal
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}
