//! Prometheus metrics for recipe generation.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Registry holding the request outcome counter and generation latency histogram.
pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    generation_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("recipe_requests_total", "Recipe generation requests by outcome"),
            &["outcome"],
        )?;
        let generation_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "recipe_generation_seconds",
                "Wall time of recipe generation, including the completion call",
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(generation_seconds.clone()))?;

        Ok(Self {
            registry,
            requests,
            generation_seconds,
        })
    }

    pub fn record(&self, outcome: &str, elapsed_secs: f64) {
        self.requests.with_label_values(&[outcome]).inc();
        self.generation_seconds.observe(elapsed_secs);
    }

    pub fn requests_with_outcome(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_render() {
        let metrics = Metrics::new().unwrap();
        metrics.record("ok", 1.2);
        metrics.record("ok", 0.4);
        metrics.record("rate_limited", 0.1);

        assert_eq!(metrics.requests_with_outcome("ok"), 2);
        assert_eq!(metrics.requests_with_outcome("rate_limited"), 1);

        let text = metrics.render().unwrap();
        assert!(text.contains("recipe_requests_total{outcome=\"ok\"} 2"));
        assert!(text.contains("recipe_generation_seconds_count 3"));
    }
}
