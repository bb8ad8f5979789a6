//! Telemetria do motor: `tracing-subscriber` sempre; OTLP (traces + métricas) com a feature `otel`.
use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::amm::TradeSide;

/// `json` liga o formatter JSON; qualquer outro valor usa o texto padrão.
pub const ENV_LOG_FORMAT: &str = "CURVE_LOG_FORMAT";

pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn json_requested() -> bool {
    std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Instala o subscriber global (fmt + EnvFilter). Falha se já houver um.
pub fn init_tracing() -> Result<()> {
    let registry = Registry::default().with(filter_from_env());
    if json_requested() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()?;
    }
    Ok(())
}

/// Span INFO com nome **estático** (exigência do tracing); lado e id vão como campos.
pub fn make_trade_span(side: TradeSide, op_id: u64) -> tracing::Span {
    let commit = std::env::var("CURVE_COMMIT_SHA").unwrap_or_else(|_| "unknown".into());
    tracing::span!(
        target: "launch_curve",
        Level::INFO,
        "trade",
        git_commit_sha = %commit,
        side = %side,
        op_id = op_id
    )
}

#[cfg(feature = "otel")]
mod otel {
    use std::time::Duration;

    use anyhow::Result;
    use opentelemetry::{
        global,
        metrics::{Histogram, MeterProvider as _},
        trace::TracerProvider as _,
        KeyValue,
    };
    use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
    use opentelemetry_sdk::{
        metrics::{PeriodicReader, SdkMeterProvider},
        trace::SdkTracerProvider,
        Resource,
    };
    use tracing_subscriber::{layer::SubscriberExt, Registry};

    use super::filter_from_env;
    use crate::amm::{TradeResult, TradeSide};

    pub struct Telemetry {
        pub tracer_provider: SdkTracerProvider,
        pub meter_provider: SdkMeterProvider,
        pub trade_latency_ms: Histogram<f64>,
        pub price_impact_percent: Histogram<f64>,
    }

    impl Telemetry {
        pub fn record_trade(&self, side: TradeSide, result: &TradeResult, elapsed: Duration) {
            let attrs = [KeyValue::new("side", side.as_str())];
            self.trade_latency_ms
                .record(elapsed.as_secs_f64() * 1000.0, &attrs);
            self.price_impact_percent
                .record(result.price_impact_percent.to_f64_lossy(), &attrs);
        }

        pub fn shutdown(&self) {
            let _ = self.meter_provider.force_flush();
            let _ = self.tracer_provider.shutdown();
        }
    }

    pub fn init(service_name: &str) -> Result<Telemetry> {
        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4318".to_string());
        let commit = std::env::var("CURVE_COMMIT_SHA").unwrap_or_else(|_| "unknown".into());

        let resource = Resource::builder()
            .with_attributes([
                KeyValue::new("service.name", service_name.to_string()),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                KeyValue::new("git.commit.sha", commit),
            ])
            .build();

        // ---- Traces (OTLP/HTTP) ----
        let span_exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(format!("{endpoint}/v1/traces"))
            .build()?;
        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_batch_exporter(span_exporter)
            .build();
        let tracer = tracer_provider.tracer("launch_curve");

        // ---- Métricas (OTLP/HTTP) ----
        let metric_exporter = MetricExporter::builder()
            .with_http()
            .with_endpoint(format!("{endpoint}/v1/metrics"))
            .build()?;
        let reader = PeriodicReader::builder(metric_exporter)
            .with_interval(Duration::from_secs(10))
            .build();
        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource)
            .with_reader(reader)
            .build();

        global::set_tracer_provider(tracer_provider.clone());
        global::set_meter_provider(meter_provider.clone());

        // tracing -> OTel
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
        let subscriber = Registry::default()
            .with(filter_from_env())
            .with(fmt_layer)
            .with(otel_layer);
        tracing::subscriber::set_global_default(subscriber)?;

        let meter = meter_provider.meter("launch_curve");
        let trade_latency_ms = meter
            .f64_histogram("trade_latency_ms")
            .with_unit("ms")
            .with_description("Latency of buy/sell computations in ms")
            .build();
        let price_impact_percent = meter
            .f64_histogram("price_impact_percent")
            .with_unit("%")
            .with_description("Price impact of computed trades")
            .build();

        Ok(Telemetry {
            tracer_provider,
            meter_provider,
            trade_latency_ms,
            price_impact_percent,
        })
    }
}

#[cfg(feature = "otel")]
pub use otel::{init, Telemetry};
