use anyhow::Context;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide Prometheus recorder (first call only) and
    /// describe the pipeline series so they show up on `/metrics`.
    pub fn init() -> anyhow::Result<Self> {
        static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

        let handle = HANDLE
            .get_or_try_init(|| {
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("prometheus: install recorder")?;
                describe();
                Ok::<_, anyhow::Error>(handle)
            })?
            .clone();

        Ok(Self { handle })
    }
}

fn describe() {
    describe_counter!(
        "feed_filter_requests_total",
        "Filter requests by mode and outcome."
    );
    describe_counter!("feed_filter_items_kept_total", "Items that passed the filter.");
    describe_counter!("feed_filter_items_dropped_total", "Items removed by the filter.");
    describe_counter!(
        "feed_filter_items_parsed_total",
        "Items parsed from upstream feeds."
    );
    describe_counter!(
        "feed_filter_upstream_errors_total",
        "Upstream fetch failures by kind."
    );
    describe_histogram!("feed_filter_fetch_ms", "Upstream fetch time in milliseconds.");
    describe_histogram!("feed_filter_parse_ms", "Feed parse time in milliseconds.");
}
