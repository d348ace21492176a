//! Logging and distributed tracing setup.
//!
//! Builds the global `tracing` subscriber: an `EnvFilter`, a console layer
//! (text or JSON, written to stdout) and, when enabled, an OpenTelemetry
//! layer exporting spans over OTLP.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::SoaResult;
use serde::{Deserialize, Serialize};

/// Target of the fixed diagnostic lines the service emits on every call.
///
/// The installed filter always passes this target at INFO, whatever
/// `RUST_LOG` or `log_filter` say.
pub const DIAGNOSTIC_TARGET: &str = "soa::diagnostic";

/// Console log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether OpenTelemetry span export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Whether to enable console output.
    #[serde(default = "default_console_output")]
    pub console_output: bool,

    /// Console log format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_service_name() -> String {
    "soa-user-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_console_output() -> bool {
    true
}

fn default_log_filter() -> String {
    "info,soa=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
            console_output: default_console_output(),
            log_format: LogFormat::default(),
            log_filter: default_log_filter(),
        }
    }
}

/// Adds the directive that keeps [`DIAGNOSTIC_TARGET`] at INFO.
#[cfg(feature = "telemetry")]
fn with_diagnostics(filter: EnvFilter) -> EnvFilter {
    match format!("{}=info", DIAGNOSTIC_TARGET).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initialize logging and tracing with the given configuration.
///
/// This sets up:
/// - an `EnvFilter` from `RUST_LOG`, falling back to `config.log_filter`
/// - a console layer in the configured format (if enabled)
/// - an OpenTelemetry layer with OTLP export (if enabled and an endpoint is set)
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> SoaResult<()> {
    let filter = with_diagnostics(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
    );

    let otel_layer = if config.enabled {
        let tracer_provider = build_tracer_provider(config)?;
        let tracer = tracer_provider.tracer("soa-user-service");
        opentelemetry::global::set_tracer_provider(tracer_provider);
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    let text_layer = (config.console_output && config.log_format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_target(true));
    let json_layer = (config.console_output && config.log_format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| crate::SoaError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        otel_enabled = config.enabled,
        sampling_ratio = %config.sampling_ratio,
        otlp_endpoint = ?config.otlp_endpoint,
        log_format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(feature = "telemetry")]
fn build_tracer_provider(config: &TelemetryConfig) -> SoaResult<opentelemetry_sdk::trace::TracerProvider> {
    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(SERVICE_NAME, config.service_name.clone())]);

    let provider = if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| crate::SoaError::Internal(format!("Failed to create OTLP exporter: {}", e)))?;

        opentelemetry_sdk::trace::TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_sampler(sampler)
            .with_id_generator(RandomIdGenerator::default())
            .with_resource(resource)
            .build()
    } else {
        opentelemetry_sdk::trace::TracerProvider::builder()
            .with_sampler(sampler)
            .with_id_generator(RandomIdGenerator::default())
            .with_resource(resource)
            .build()
    };

    Ok(provider)
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(_config: &TelemetryConfig) -> SoaResult<()> {
    Ok(())
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.service_name, "soa-user-service");
        assert_eq!(config.sampling_ratio, 1.0);
        assert!(config.console_output);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.log_filter, "info,soa=debug");
    }

    #[test]
    fn test_log_format_from_json() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{"log_format": "json", "enabled": true}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.service_name, "soa-user-service");
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn test_diagnostic_target_passes_strict_filter() {
        use tracing::Level;

        let subscriber = tracing_subscriber::registry().with(with_diagnostics(EnvFilter::new("error")));

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "soa::diagnostic", Level::INFO));
            assert!(!tracing::enabled!(target: "soa::service", Level::INFO));
        });
    }
}
