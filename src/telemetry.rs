use tracing::info;

/// External telemetry collaborator.
///
/// The registrar asks for one capability only: enable tracing for the
/// activity sources a provider declares. Invoked at most once per
/// successful provider registration; idempotency beyond that is the
/// collaborator's concern.
pub trait TelemetrySink {
    /// Subscribe the named activity sources for a provider namespace.
    fn subscribe(&self, namespace: &str, sources: &[&str]);
}

/// Sink that records subscriptions in the log stream.
///
/// Useful as a default while the host wires a real telemetry bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn subscribe(&self, namespace: &str, sources: &[&str]) {
        info!(namespace, ?sources, "tracing enabled for activity sources");
    }
}
