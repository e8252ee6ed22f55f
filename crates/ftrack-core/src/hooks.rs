//! Observation hooks
//!
//! The service reports domain events through the `EventObserver` trait so the
//! core logic stays independent of whatever collects them. `TracingObserver`
//! forwards events to the log; `NoOpObserver` drops them.

use std::collections::BTreeMap;

pub const FEATURE_REQUEST_CREATED: &str = "feature_request.created";
pub const FEATURE_REQUEST_STATUS_CHANGED: &str = "feature_request.status_changed";
pub const FEATURE_REQUEST_DELETED: &str = "feature_request.deleted";

/// Event attributes, ordered so log output is stable.
pub type EventAttributes = BTreeMap<&'static str, String>;

/// Receives named events with string attributes.
///
/// Implementations must not fail the calling operation.
pub trait EventObserver: Send + Sync {
    fn record(&self, event: &str, attributes: &EventAttributes);
}

/// Emits each event as an `info` record under the `ftrack::events` target.
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn record(&self, event: &str, attributes: &EventAttributes) {
        let rendered = attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(target: "ftrack::events", event = %event, attributes = %rendered, "domain event");
    }
}

/// No-op implementation for when events are not collected
pub struct NoOpObserver;

impl EventObserver for NoOpObserver {
    fn record(&self, _event: &str, _attributes: &EventAttributes) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_observers_accept_events() {
        let attributes = EventAttributes::from([("id", "42".to_string())]);
        let observers: Vec<Arc<dyn EventObserver>> =
            vec![Arc::new(TracingObserver), Arc::new(NoOpObserver)];
        for observer in observers {
            observer.record(FEATURE_REQUEST_CREATED, &attributes);
        }
    }
}
