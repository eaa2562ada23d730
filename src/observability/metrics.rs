use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub trips_planned_total: IntCounterVec,
    pub trip_advances_total: IntCounterVec,
    pub planning_latency_seconds: HistogramVec,
    pub locations_stored: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let trips_planned_total = IntCounterVec::new(
            Opts::new("trips_planned_total", "Total planned trips by outcome"),
            &["outcome"],
        )
        .expect("valid trips_planned_total metric");

        let trip_advances_total = IntCounterVec::new(
            Opts::new(
                "trip_advances_total",
                "Total trip lifecycle advances by outcome",
            ),
            &["outcome"],
        )
        .expect("valid trip_advances_total metric");

        let planning_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "planning_latency_seconds",
                "Latency of route planning in seconds",
            ),
            &["outcome"],
        )
        .expect("valid planning_latency_seconds metric");

        let locations_stored =
            IntGauge::new("locations_stored", "Current number of stored locations")
                .expect("valid locations_stored metric");

        registry
            .register(Box::new(trips_planned_total.clone()))
            .expect("register trips_planned_total");
        registry
            .register(Box::new(trip_advances_total.clone()))
            .expect("register trip_advances_total");
        registry
            .register(Box::new(planning_latency_seconds.clone()))
            .expect("register planning_latency_seconds");
        registry
            .register(Box::new(locations_stored.clone()))
            .expect("register locations_stored");

        Self {
            registry,
            trips_planned_total,
            trip_advances_total,
            planning_latency_seconds,
            locations_stored,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
