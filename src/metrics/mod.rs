use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Counters for the business flows that matter:
// - order placement outcomes (placed / rejected by reason)
// - inventory mutations (created, discontinued)
// - agent endpoint usage
//
// All metrics are registered with Prometheus and scraped via /metrics.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub orders_placed: IntCounter,
    pub orders_rejected: IntCounterVec,

    pub items_created: IntCounter,
    pub items_discontinued: IntCounter,

    pub agent_requests: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_placed = IntCounter::new(
            "orders_placed_total",
            "Total orders successfully placed",
        )?;
        registry.register(Box::new(orders_placed.clone()))?;

        let orders_rejected = IntCounterVec::new(
            Opts::new("orders_rejected_total", "Total order placements rejected"),
            &["reason"],
        )?;
        registry.register(Box::new(orders_rejected.clone()))?;

        let items_created = IntCounter::new(
            "inventory_items_created_total",
            "Total inventory items created",
        )?;
        registry.register(Box::new(items_created.clone()))?;

        let items_discontinued = IntCounter::new(
            "inventory_items_discontinued_total",
            "Total inventory items soft-deleted to discontinued",
        )?;
        registry.register(Box::new(items_discontinued.clone()))?;

        let agent_requests = IntCounterVec::new(
            Opts::new("agent_requests_total", "Total agent endpoint requests"),
            &["agent", "outcome"],
        )?;
        registry.register(Box::new(agent_requests.clone()))?;

        Ok(Self {
            registry,
            orders_placed,
            orders_rejected,
            items_created,
            items_discontinued,
            agent_requests,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_rejected(&self, reason: &str) {
        self.orders_rejected.with_label_values(&[reason]).inc();
    }

    pub fn record_agent_request(&self, agent: &str, success: bool) {
        let outcome = if success { "ok" } else { "error" };
        self.agent_requests.with_label_values(&[agent, outcome]).inc();
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(err) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!("failed to encode metrics: {}", err);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(!metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_order_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.orders_placed.inc();
        metrics.record_order_rejected("INSUFFICIENT_STOCK");
        metrics.record_order_rejected("INSUFFICIENT_STOCK");

        assert_eq!(metrics.orders_placed.get(), 1);
        assert_eq!(
            metrics
                .orders_rejected
                .with_label_values(&["INSUFFICIENT_STOCK"])
                .get(),
            2
        );
    }

    #[test]
    fn test_render_text_format() {
        let metrics = Metrics::new().unwrap();
        metrics.items_created.inc();
        let body = metrics.render();
        assert!(body.contains("inventory_items_created_total 1"));
    }
}
