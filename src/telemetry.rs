use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref AUTH_EVENTS: CounterVec = register_counter_vec!(
        "auth_events_total",
        "Signup, login and logout attempts by outcome",
        &["event", "outcome"]
    )
    .expect("auth_events_total is registered once");
}

pub fn record_auth_event(event: &str, outcome: &str) {
    AUTH_EVENTS.with_label_values(&[event, outcome]).inc();
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
