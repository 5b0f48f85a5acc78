use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    chat_turns_total: AtomicU64,
    local_intent_total: AtomicU64,
    remote_calls_total: AtomicU64,
    remote_fallback_total: AtomicU64,
    payslips_rendered_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub chat_turns_total: u64,
    pub local_intent_total: u64,
    pub remote_calls_total: u64,
    pub remote_fallback_total: u64,
    pub payslips_rendered_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_chat_turn(&self) {
        self.chat_turns_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("salario_chat_turns_total").increment(1);
    }

    pub fn inc_local_intent(&self, intent: &'static str) {
        self.local_intent_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("salario_local_intent_total", "intent" => intent).increment(1);
    }

    pub fn inc_remote_call(&self) {
        self.remote_calls_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("salario_remote_calls_total").increment(1);
    }

    pub fn inc_remote_fallback(&self) {
        self.remote_fallback_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("salario_remote_fallback_total").increment(1);
    }

    pub fn inc_payslip_rendered(&self) {
        self.payslips_rendered_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("salario_payslips_rendered_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        metrics::histogram!("salario_chat_latency_seconds").record(duration.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let turns = self.chat_turns_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            chat_turns_total: turns,
            local_intent_total: self.local_intent_total.load(Ordering::Relaxed),
            remote_calls_total: self.remote_calls_total.load(Ordering::Relaxed),
            remote_fallback_total: self.remote_fallback_total.load(Ordering::Relaxed),
            payslips_rendered_total: self.payslips_rendered_total.load(Ordering::Relaxed),
            avg_latency_millis: if turns == 0 {
                0.0
            } else {
                latency as f64 / turns as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,salario_agents=info,salario_storage=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
