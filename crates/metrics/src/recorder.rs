//! Metrics recorder initialization and configuration.

use {anyhow::Result, tracing::info};

/// Handle to the metrics system, providing access to exported metrics.
#[derive(Clone)]
pub struct MetricsHandle {
    #[cfg(feature = "prometheus")]
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsHandle {
    /// Render metrics in Prometheus text format for the `/metrics` endpoint.
    #[must_use]
    pub fn render(&self) -> String {
        #[cfg(feature = "prometheus")]
        {
            self.prometheus_handle.render()
        }
        #[cfg(not(feature = "prometheus"))]
        {
            String::new()
        }
    }
}

/// Configuration for the metrics system.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorderConfig {
    /// Whether metrics collection is enabled
    pub enabled: bool,
}

/// Initialize the metrics system.
///
/// Call once at startup. Returns `None` when collection is disabled so the
/// caller can skip mounting the `/metrics` route.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed or the
/// exporter rejects its bucket configuration.
pub fn init_metrics(config: MetricsRecorderConfig) -> Result<Option<MetricsHandle>> {
    if !config.enabled {
        info!("metrics collection is disabled");
        return Ok(None);
    }

    #[cfg(feature = "prometheus")]
    {
        let handle = init_prometheus()?;
        info!("prometheus metrics exporter initialized");
        Ok(Some(MetricsHandle {
            prometheus_handle: handle,
        }))
    }

    #[cfg(not(feature = "prometheus"))]
    {
        info!("metrics feature not enabled at compile time");
        Ok(None)
    }
}

#[cfg(feature = "prometheus")]
fn init_prometheus() -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    use {
        crate::{buckets, webhook},
        metrics_exporter_prometheus::{Matcher, PrometheusBuilder},
    };

    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(webhook::PROCESSING_DURATION_SECONDS.to_string()),
        &buckets::PROCESSING_DURATION,
    )?;

    // Installs globally without spawning an HTTP listener; the gateway serves
    // the rendered text itself.
    Ok(builder.install_recorder()?)
}
